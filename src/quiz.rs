//! Built-in quiz question sets.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: &'static str,
    pub options: [&'static str; 4],
    pub correct_answer: usize,
}

const EQUIPMENT: &[Question] = &[
    Question {
        question: "What is the main benefit of sharing farm equipment?",
        options: [
            "Lower costs for every farmer",
            "More machines per farm",
            "Higher fuel use",
            "Longer queues at the market",
        ],
        correct_answer: 0,
    },
    Question {
        question: "Which implement is used to prepare soil before sowing?",
        options: ["Rotavator", "Thresher", "Sprayer", "Winnower"],
        correct_answer: 0,
    },
    Question {
        question: "What should you check before renting a tractor?",
        options: [
            "Its colour",
            "Service condition and fuel level",
            "The owner's crops",
            "Nothing",
        ],
        correct_answer: 1,
    },
    Question {
        question: "Drip irrigation mainly helps to:",
        options: [
            "Flood the field",
            "Save water",
            "Remove weeds",
            "Harvest faster",
        ],
        correct_answer: 1,
    },
    Question {
        question: "Idle equipment on a farm is best:",
        options: [
            "Left to rust",
            "Sold for scrap",
            "Shared or rented to neighbours",
            "Burned",
        ],
        correct_answer: 2,
    },
];

const BYPRODUCTS: &[Question] = &[
    Question {
        question: "Rice husk can be used as:",
        options: ["Fuel and packing material", "Fertiliser only", "Animal feed only", "Nothing"],
        correct_answer: 0,
    },
    Question {
        question: "Sugarcane bagasse is commonly used to make:",
        options: ["Glass", "Paper and biofuel", "Steel", "Plastic bottles"],
        correct_answer: 1,
    },
    Question {
        question: "Why should crop residue not be burned?",
        options: [
            "It is too heavy",
            "It pollutes the air and harms the soil",
            "It is illegal to touch",
            "It smells good",
        ],
        correct_answer: 1,
    },
    Question {
        question: "Animal manure is most valuable for:",
        options: ["Composting", "Construction", "Road paving", "Painting"],
        correct_answer: 0,
    },
    Question {
        question: "Coconut husk fibre is known as:",
        options: ["Jute", "Coir", "Silk", "Hemp"],
        correct_answer: 1,
    },
];

const SUSTAINABILITY: &[Question] = &[
    Question {
        question: "Crop rotation helps to:",
        options: [
            "Exhaust the soil",
            "Keep soil fertile and break pest cycles",
            "Use more pesticide",
            "Grow one crop forever",
        ],
        correct_answer: 1,
    },
    Question {
        question: "Which practice conserves soil moisture?",
        options: ["Mulching", "Deep ploughing every week", "Burning stubble", "Over-irrigation"],
        correct_answer: 0,
    },
    Question {
        question: "Vermicompost is made with the help of:",
        options: ["Earthworms", "Bees", "Fish", "Birds"],
        correct_answer: 0,
    },
    Question {
        question: "Integrated pest management prefers:",
        options: [
            "Only chemical sprays",
            "Biological and cultural controls first",
            "Ignoring pests",
            "Burning fields",
        ],
        correct_answer: 1,
    },
    Question {
        question: "Rainwater harvesting is used to:",
        options: ["Store water for dry periods", "Drain fields", "Cool tractors", "Wash roads"],
        correct_answer: 0,
    },
];

pub const QUIZ_TYPES: [&str; 3] = ["equipment", "byproducts", "sustainability"];

/// The question set for a quiz type, matched case-insensitively.
pub fn questions(quiz_type: &str) -> Option<&'static [Question]> {
    match quiz_type.to_ascii_lowercase().as_str() {
        "equipment" => Some(EQUIPMENT),
        "byproducts" => Some(BYPRODUCTS),
        "sustainability" => Some(SUSTAINABILITY),
        _ => None,
    }
}
