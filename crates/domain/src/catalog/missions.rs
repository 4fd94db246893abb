use crate::entities::Mission;

fn mission(
    id: u32,
    title: &str,
    description: &str,
    scenario: &str,
    target_affection_gain: i32,
    completion_threshold: u32,
) -> Mission {
    Mission {
        id,
        title: title.to_string(),
        description: description.to_string(),
        scenario: scenario.to_string(),
        target_affection_gain,
        completion_threshold,
    }
}

/// The five-date storyline shipped with the game.
pub(super) fn standard_missions() -> Vec<Mission> {
    vec![
        mission(
            1,
            "First Encounter",
            "You spot Adrian at a cozy rooftop cafe. Make a good first impression.",
            "The evening sun casts a golden glow over the rooftop cafe. \
             Adrian sits at a corner table, reading a book with a coffee beside him. \
             His dark hair catches the light as he looks up, noticing you.",
            15,
            4,
        ),
        mission(
            2,
            "The Art Gallery",
            "Adrian invited you to an art gallery opening. Show your genuine side.",
            "A sleek modern art gallery buzzes with soft conversation. \
             Adrian stands before a large abstract painting, wearing a fitted navy blazer. \
             He smiles warmly when he sees you arrive.",
            20,
            5,
        ),
        mission(
            3,
            "Rainy Day Walk",
            "A surprise rainstorm catches you both. Turn it into a romantic moment.",
            "A sunny afternoon walk has turned into a downpour. \
             You and Adrian take shelter under a large oak tree, rain drumming all around. \
             He laughs, shaking water from his hair.",
            25,
            5,
        ),
        mission(
            4,
            "Cooking Together",
            "Adrian invited you to his apartment to cook dinner. Get closer.",
            "Adrian's apartment is warm and inviting, with soft music playing. \
             The kitchen counter is spread with fresh ingredients. \
             He hands you an apron with a playful grin.",
            25,
            5,
        ),
        mission(
            5,
            "Stargazing Confession",
            "A quiet night under the stars. The moment of truth.",
            "You and Adrian lie on a blanket on a hilltop outside the city. \
             The stars spread endlessly above. \
             Adrian turns to look at you, his expression soft and unguarded.",
            30,
            6,
        ),
    ]
}
