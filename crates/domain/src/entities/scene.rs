//! Scene geometry and the per-scene action catalog.

use serde::{Deserialize, Serialize};

use crate::value_objects::Vec2;

/// Rendering hint for an obstacle's outline.
///
/// Collision ignores the shape: ellipses collide with their bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObjectShape {
    #[default]
    Rectangle,
    Ellipse,
}

/// Ambient particle effect drawn over a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherEffect {
    #[default]
    None,
    Rain,
    Fireflies,
    Sparkles,
}

impl WeatherEffect {
    pub fn is_animated(self) -> bool {
        !matches!(self, WeatherEffect::None)
    }
}

/// Static obstacle placed in a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: String,
    pub label: String,
    /// Center of the object
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub shape: ObjectShape,
    /// ARGB color, e.g. `0xFF6B4226`
    pub color: u32,
}

impl SceneObject {
    pub fn rect(
        id: impl Into<String>,
        label: impl Into<String>,
        position: Vec2,
        width: f32,
        height: f32,
        color: u32,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            position,
            width,
            height,
            shape: ObjectShape::Rectangle,
            color,
        }
    }

    pub fn ellipse(
        id: impl Into<String>,
        label: impl Into<String>,
        position: Vec2,
        width: f32,
        height: f32,
        color: u32,
    ) -> Self {
        Self {
            shape: ObjectShape::Ellipse,
            ..Self::rect(id, label, position, width, height, color)
        }
    }

    pub fn half_extents(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// True when `point` lies strictly inside the bounding box grown by `padding`.
    pub fn padded_contains(&self, point: Vec2, padding: f32) -> bool {
        let (half_w, half_h) = self.half_extents();
        let half_w = half_w + padding;
        let half_h = half_h + padding;
        point.x > self.position.x - half_w
            && point.x < self.position.x + half_w
            && point.y > self.position.y - half_h
            && point.y < self.position.y + half_h
    }
}

/// Something the player can do to the NPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAction {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub requires_proximity: bool,
}

impl PlayerAction {
    /// Action id used for free-text messages typed by the player.
    pub const FREE_TEXT_ID: &'static str = "say";

    pub fn new(id: impl Into<String>, label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: icon.into(),
            requires_proximity: true,
        }
    }

    /// Wrap a typed message as an action whose label is the raw text.
    pub fn free_text(text: impl Into<String>) -> Self {
        Self::new(Self::FREE_TEXT_ID, text, "💬")
    }

    pub fn without_proximity(mut self) -> Self {
        self.requires_proximity = false;
        self
    }

    pub fn is_free_text(&self) -> bool {
        self.id == Self::FREE_TEXT_ID
    }
}

/// Everything needed to lay out one mission's play area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDefinition {
    pub background_color: u32,
    pub floor_color: u32,
    pub objects: Vec<SceneObject>,
    pub player_spawn: Vec2,
    pub npc_spawn: Vec2,
    pub weather: WeatherEffect,
    pub actions: Vec<PlayerAction>,
}

impl SceneDefinition {
    pub fn find_action(&self, action_id: &str) -> Option<&PlayerAction> {
        self.actions.iter().find(|a| a.id == action_id)
    }

    /// True when `point` collides with any obstacle's padded bounds.
    pub fn blocks(&self, point: Vec2, padding: f32) -> bool {
        self.objects.iter().any(|o| o.padded_contains(point, padding))
    }
}
