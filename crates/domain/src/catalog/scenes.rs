use crate::entities::{PlayerAction, SceneDefinition, SceneObject, WeatherEffect};
use crate::value_objects::Vec2;

fn universal_actions() -> Vec<PlayerAction> {
    vec![
        PlayerAction::new("smile", "Smile", "😊"),
        PlayerAction::new("compliment", "Compliment", "💖"),
        PlayerAction::new("joke", "Tell a Joke", "😄"),
    ]
}

fn with_universal(extra: Vec<PlayerAction>) -> Vec<PlayerAction> {
    let mut actions = universal_actions();
    actions.extend(extra);
    actions
}

/// One scene per mission, in mission order.
pub(super) fn standard_scenes() -> Vec<SceneDefinition> {
    vec![
        cafe_scene(),
        gallery_scene(),
        park_scene(),
        kitchen_scene(),
        stargazing_scene(),
    ]
}

fn cafe_scene() -> SceneDefinition {
    SceneDefinition {
        background_color: 0xFF2D1B0E,
        floor_color: 0xFF8B6914,
        objects: vec![
            SceneObject::ellipse("table1", "Table", Vec2::new(0.30, 0.30), 0.10, 0.10, 0xFF6B4226),
            SceneObject::ellipse("table2", "Table", Vec2::new(0.70, 0.25), 0.10, 0.10, 0xFF6B4226),
            SceneObject::ellipse("table3", "Table", Vec2::new(0.50, 0.55), 0.10, 0.10, 0xFF6B4226),
            SceneObject::rect("counter", "Counter", Vec2::new(0.50, 0.08), 0.60, 0.06, 0xFF4A3728),
            SceneObject::ellipse("plant1", "Plant", Vec2::new(0.10, 0.10), 0.06, 0.06, 0xFF2E7D32),
            SceneObject::ellipse("plant2", "Plant", Vec2::new(0.90, 0.10), 0.06, 0.06, 0xFF2E7D32),
            SceneObject::rect("railing", "Railing", Vec2::new(0.50, 0.95), 0.90, 0.02, 0xFF795548),
        ],
        player_spawn: Vec2::new(0.50, 0.80),
        npc_spawn: Vec2::new(0.70, 0.30),
        weather: WeatherEffect::None,
        actions: with_universal(vec![
            PlayerAction::new("sit", "Sit With Him", "🪑"),
            PlayerAction::new("order", "Order Drinks", "☕"),
            PlayerAction::new("ask_book", "Ask About Book", "📖"),
            PlayerAction::new("share_story", "Share a Story", "💬"),
        ]),
    }
}

fn gallery_scene() -> SceneDefinition {
    SceneDefinition {
        background_color: 0xFF1A1A2E,
        floor_color: 0xFF555566,
        objects: vec![
            SceneObject::rect("painting1", "Painting", Vec2::new(0.15, 0.05), 0.12, 0.08, 0xFFE91E63),
            SceneObject::rect("painting2", "Painting", Vec2::new(0.45, 0.05), 0.14, 0.08, 0xFF2196F3),
            SceneObject::rect("painting3", "Painting", Vec2::new(0.78, 0.05), 0.12, 0.08, 0xFFFF9800),
            SceneObject::rect("painting4", "Painting", Vec2::new(0.05, 0.40), 0.04, 0.14, 0xFF9C27B0),
            SceneObject::rect("bench1", "Bench", Vec2::new(0.35, 0.45), 0.12, 0.04, 0xFF5D4037),
            SceneObject::rect("bench2", "Bench", Vec2::new(0.65, 0.65), 0.12, 0.04, 0xFF5D4037),
            SceneObject::ellipse("sculpture", "Sculpture", Vec2::new(0.85, 0.35), 0.06, 0.06, 0xFFBDBDBD),
        ],
        player_spawn: Vec2::new(0.25, 0.80),
        npc_spawn: Vec2::new(0.65, 0.30),
        weather: WeatherEffect::Sparkles,
        actions: with_universal(vec![
            PlayerAction::new("discuss_art", "Discuss Painting", "🎨"),
            PlayerAction::new("share_opinion", "Share Opinion", "🤔"),
            PlayerAction::new("suggest_next", "Next Exhibit", "👉"),
            PlayerAction::new("photo", "Take Photo", "📸"),
        ]),
    }
}

fn park_scene() -> SceneDefinition {
    SceneDefinition {
        background_color: 0xFF1B3A1B,
        floor_color: 0xFF4CAF50,
        objects: vec![
            SceneObject::ellipse("tree1", "Oak Tree", Vec2::new(0.15, 0.20), 0.14, 0.14, 0xFF2E7D32),
            SceneObject::ellipse("tree2", "Tree", Vec2::new(0.80, 0.15), 0.12, 0.12, 0xFF388E3C),
            SceneObject::ellipse("tree3", "Tree", Vec2::new(0.10, 0.65), 0.10, 0.10, 0xFF43A047),
            SceneObject::rect("bench", "Park Bench", Vec2::new(0.55, 0.40), 0.14, 0.04, 0xFF5D4037),
            SceneObject::rect("path", "Path", Vec2::new(0.50, 0.70), 0.20, 0.50, 0xFFBCAAA4),
            SceneObject::ellipse("puddle1", "Puddle", Vec2::new(0.35, 0.60), 0.07, 0.05, 0xFF42A5F5),
            SceneObject::ellipse("puddle2", "Puddle", Vec2::new(0.60, 0.75), 0.06, 0.04, 0xFF42A5F5),
        ],
        player_spawn: Vec2::new(0.30, 0.85),
        npc_spawn: Vec2::new(0.55, 0.35),
        weather: WeatherEffect::Rain,
        actions: with_universal(vec![
            PlayerAction::new("umbrella", "Share Umbrella", "☂️"),
            PlayerAction::new("splash", "Splash Puddle", "💦"),
            PlayerAction::new("shelter", "Find Shelter", "🏠"),
            PlayerAction::new("dance_rain", "Dance in Rain", "💃"),
        ]),
    }
}

fn kitchen_scene() -> SceneDefinition {
    SceneDefinition {
        background_color: 0xFF2D1B0E,
        floor_color: 0xFFD7CCC8,
        objects: vec![
            SceneObject::rect("counter", "Counter", Vec2::new(0.50, 0.12), 0.70, 0.08, 0xFF5D4037),
            SceneObject::rect("stove", "Stove", Vec2::new(0.80, 0.12), 0.10, 0.08, 0xFF37474F),
            SceneObject::rect("sink", "Sink", Vec2::new(0.20, 0.12), 0.08, 0.06, 0xFF78909C),
            SceneObject::rect("table", "Table", Vec2::new(0.50, 0.60), 0.22, 0.14, 0xFF6D4C41),
            SceneObject::rect("ingredients", "Ingredients", Vec2::new(0.45, 0.10), 0.06, 0.04, 0xFFFF8A65),
            SceneObject::ellipse("pot", "Pot", Vec2::new(0.80, 0.10), 0.04, 0.04, 0xFF546E7A),
        ],
        player_spawn: Vec2::new(0.35, 0.80),
        npc_spawn: Vec2::new(0.55, 0.20),
        weather: WeatherEffect::None,
        actions: with_universal(vec![
            PlayerAction::new("chop", "Help Chop", "🔪"),
            PlayerAction::new("taste", "Taste Sauce", "🥤"),
            PlayerAction::new("flour", "Toss Flour", "🌬️"),
            PlayerAction::new("set_table", "Set Table", "🍽️"),
        ]),
    }
}

fn stargazing_scene() -> SceneDefinition {
    SceneDefinition {
        background_color: 0xFF0A0A2E,
        floor_color: 0xFF1B3A1B,
        objects: vec![
            SceneObject::rect("blanket", "Blanket", Vec2::new(0.50, 0.45), 0.24, 0.16, 0xFFAD1457),
            SceneObject::rect("telescope", "Telescope", Vec2::new(0.72, 0.35), 0.05, 0.08, 0xFF78909C),
            SceneObject::ellipse("tree1", "Tree", Vec2::new(0.08, 0.20), 0.12, 0.12, 0xFF1B5E20),
            SceneObject::ellipse("tree2", "Tree", Vec2::new(0.92, 0.50), 0.10, 0.10, 0xFF1B5E20),
            SceneObject::rect("basket", "Picnic Basket", Vec2::new(0.38, 0.50), 0.05, 0.04, 0xFF6D4C41),
        ],
        player_spawn: Vec2::new(0.40, 0.75),
        npc_spawn: Vec2::new(0.55, 0.42),
        weather: WeatherEffect::Fireflies,
        actions: with_universal(vec![
            PlayerAction::new("constellation", "Point at Stars", "⭐"),
            PlayerAction::new("move_closer", "Scoot Closer", "🥺"),
            PlayerAction::new("share_memory", "Share Memory", "💭"),
            PlayerAction::new("hold_hand", "Take His Hand", "🤝"),
        ]),
    }
}
