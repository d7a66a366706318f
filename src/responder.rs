//! The chat assistant's canned replies.
//!
//! A message is answered by exact match on a known question, then by the first
//! keyword (in table order) it contains, then by [`DEFAULT_REPLY`].

pub const DEFAULT_REPLY: &str = "I'm not sure I understand. Could you please rephrase your question? You can ask me about:\n• Equipment sharing\n• Byproducts marketplace\n• GreenPoints rewards\n• Sustainable farming\n• Account help";

const RENT_EQUIPMENT: &str = "how do i rent equipment";
const SELL_BYPRODUCTS: &str = "how to sell byproducts";
const GREENPOINTS: &str = "what are greenpoints";
const SUSTAINABLE_FARMING: &str = "what is sustainable farming";
const FEES: &str = "is there any fee";
const SUPPORT: &str = "how to contact support";
const GETTING_STARTED: &str = "how to get started";

const KNOWLEDGE_BASE: &[(&str, &str)] = &[
    ("hello", "Hello! How can I help you with your farming needs today?"),
    ("hi", "Hi there! I'm your farming assistant. What can I help you with?"),
    (
        "what is khetsathi",
        "KhetSathi is a sustainable farming platform that helps farmers turn farm waste and idle equipment into wealth. We provide equipment sharing, byproducts marketplace, educational quizzes, and GreenPoints rewards to promote eco-friendly farming practices.",
    ),
    (
        RENT_EQUIPMENT,
        "To rent equipment:\n1. Go to the Equipment page\n2. Browse available equipment from other farmers\n3. Click 'Rent Now' on the equipment you need\n4. Contact the owner to arrange pickup/delivery\n5. Enjoy using shared equipment and saving money!",
    ),
    (
        SELL_BYPRODUCTS,
        "To sell byproducts:\n1. Visit the ByProducts page\n2. Click 'Sell ByProduct' button\n3. Fill in details (name, description, price, quantity)\n4. Upload photos if available\n5. List your byproduct for other farmers to purchase",
    ),
    (
        GREENPOINTS,
        "GreenPoints are reward points you earn for sustainable actions:\n• Listing equipment: 10 points\n• Selling byproducts: 15 points\n• Completing quizzes: 5 points per 10% score\n• Renting equipment: 5 points\nPoints can be redeemed for discounts and premium features!",
    ),
    (
        "how to earn more greenpoints",
        "Earn GreenPoints by:\n• Sharing equipment with other farmers\n• Selling agricultural byproducts\n• Completing educational quizzes\n• Renting instead of buying equipment\n• Participating in community activities",
    ),
    (
        "what equipment can i share",
        "You can share various agricultural equipment:\n• Tractors and trailers\n• Rotavators and tillers\n• Harvesting equipment\n• Irrigation systems\n• Sprayers and dusters\n• Any farm tool that others might need",
    ),
    (
        "what byproducts can i sell",
        "Common byproducts to sell:\n• Rice husk and straw\n• Sugarcane bagasse\n• Coconut shells and husks\n• Banana stems and leaves\n• Crop residues\n• Animal manure for composting",
    ),
    (
        "how does equipment sharing work",
        "Equipment sharing works through our platform:\n1. List your idle equipment for rent\n2. Other farmers browse and rent it\n3. You earn money from rentals\n4. Renters save money vs buying\n5. Everyone contributes to reducing waste",
    ),
    (
        FEES,
        "KhetSathi is free for basic use! We only charge a small service fee (5%) on successful equipment rentals and byproduct sales to maintain the platform. There are no subscription fees.",
    ),
    (
        SUPPORT,
        "You can contact our support team:\n• Email: support@khetsathi.com\n• Phone: +1 (555) 123-4567\n• Community Chat: Visit the Community page\n• Help Center: Available in your profile",
    ),
    (
        SUSTAINABLE_FARMING,
        "Sustainable farming involves practices that:\n• Protect environment and biodiversity\n• Conserve water and soil resources\n• Reduce chemical inputs\n• Promote crop rotation\n• Utilize renewable resources\n• Minimize waste through recycling",
    ),
    (
        GETTING_STARTED,
        "Getting started is easy:\n1. Create your free account\n2. Complete your profile\n3. Browse equipment or byproducts\n4. List your own items if available\n5. Start earning and learning!",
    ),
];

// Order matters: the first keyword found in the message wins.
const KEYWORDS: &[(&str, &str)] = &[
    ("equipment", RENT_EQUIPMENT),
    ("rent", RENT_EQUIPMENT),
    ("share", RENT_EQUIPMENT),
    ("byproduct", SELL_BYPRODUCTS),
    ("sell", SELL_BYPRODUCTS),
    ("market", SELL_BYPRODUCTS),
    ("greenpoint", GREENPOINTS),
    ("reward", GREENPOINTS),
    ("point", GREENPOINTS),
    ("sustainable", SUSTAINABLE_FARMING),
    ("eco", SUSTAINABLE_FARMING),
    ("environment", SUSTAINABLE_FARMING),
    ("fee", FEES),
    ("cost", FEES),
    ("price", FEES),
    ("support", SUPPORT),
    ("help", SUPPORT),
    ("contact", SUPPORT),
    ("start", GETTING_STARTED),
    ("begin", GETTING_STARTED),
    ("create", GETTING_STARTED),
];

fn normalize(input: &str) -> String {
    input
        .trim()
        .to_lowercase()
        .trim_end_matches(['?', '!', '.'])
        .trim_end()
        .to_string()
}

fn answer(question: &str) -> Option<&'static str> {
    KNOWLEDGE_BASE
        .iter()
        .find(|(q, _)| *q == question)
        .map(|(_, a)| *a)
}

pub fn reply(input: &str) -> &'static str {
    let message = normalize(input);

    if let Some(exact) = answer(&message) {
        return exact;
    }

    KEYWORDS
        .iter()
        .find(|(keyword, _)| message.contains(keyword))
        .and_then(|(_, question)| answer(question))
        .unwrap_or(DEFAULT_REPLY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_question_ignores_case_and_punctuation() {
        assert_eq!(reply("What is KhetSathi?"), answer("what is khetsathi").unwrap());
        assert_eq!(reply("  HELLO!  "), answer("hello").unwrap());
    }

    #[test]
    fn keyword_match_finds_rental_answer() {
        assert_eq!(reply("I want to rent a tractor"), answer(RENT_EQUIPMENT).unwrap());
    }

    #[test]
    fn unknown_topic_gets_default() {
        assert_eq!(reply("xyzzy not a real topic"), DEFAULT_REPLY);
        assert_eq!(reply(""), DEFAULT_REPLY);
    }

    #[test]
    fn earlier_keyword_wins() {
        // "sell" is declared before "cost".
        assert_eq!(reply("how much does it cost to sell"), answer(SELL_BYPRODUCTS).unwrap());
        // "reward" is declared before "help".
        assert_eq!(reply("help me with rewards"), answer(GREENPOINTS).unwrap());
    }

    #[test]
    fn every_keyword_points_at_a_known_question() {
        for (keyword, question) in KEYWORDS {
            assert!(answer(question).is_some(), "{keyword} -> {question}");
        }
    }

    #[test]
    fn never_empty() {
        for input in ["", "   ", "?", "eco", "💧 water", "CREATE account"] {
            assert!(!reply(input).is_empty());
        }
    }
}
