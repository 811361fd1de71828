use serde::{Deserialize, Serialize};

use super::GeometryError;

/// Gesture a key binding is selected by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Tap,
    LongPress,
    SwipeUp,
    SwipeDown,
    SwipeLeft,
    SwipeRight,
    Combo,
}

impl GestureKind {
    pub const ALL: [GestureKind; 7] = [
        GestureKind::Tap,
        GestureKind::LongPress,
        GestureKind::SwipeUp,
        GestureKind::SwipeDown,
        GestureKind::SwipeLeft,
        GestureKind::SwipeRight,
        GestureKind::Combo,
    ];

    pub fn is_swipe(self) -> bool {
        matches!(
            self,
            GestureKind::SwipeUp
                | GestureKind::SwipeDown
                | GestureKind::SwipeLeft
                | GestureKind::SwipeRight
        )
    }
}

/// What a key sends for one gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub gesture: GestureKind,
    pub code: i32,
    #[serde(default)]
    pub mask: u32,
    /// Multi-character binding, injected as text instead of a key code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl KeyBinding {
    pub fn new(gesture: GestureKind, code: i32) -> Self {
        Self {
            gesture,
            code,
            mask: 0,
            text: None,
            preview: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_mask(mut self, mask: u32) -> Self {
        self.mask = mask;
        self
    }
}

/// One laid-out key. Coordinates are keyboard-local pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub gap: i32,
    /// Code sent for a plain tap when no explicit tap binding exists.
    pub code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<KeyBinding>,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub repeatable: bool,
    /// Shift keys flagged sticky lock instead of toggling once.
    #[serde(default)]
    pub sticky: bool,
    /// Long-press opens a popup sub-keyboard.
    #[serde(default)]
    pub popup: bool,
}

impl Key {
    pub fn new(x: i32, y: i32, width: i32, height: i32, code: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            gap: 0,
            code,
            label: None,
            bindings: Vec::new(),
            shift: false,
            repeatable: false,
            sticky: false,
            popup: false,
        }
    }

    pub fn with_gap(mut self, gap: i32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Adds a binding, replacing any previous one for the same gesture.
    pub fn with_binding(mut self, binding: KeyBinding) -> Self {
        self.bindings.retain(|b| b.gesture != binding.gesture);
        self.bindings.push(binding);
        self
    }

    pub fn as_shift(mut self, sticky: bool) -> Self {
        self.shift = true;
        self.sticky = sticky;
        self
    }

    pub fn as_repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    pub fn with_popup(mut self) -> Self {
        self.popup = true;
        self
    }

    /// Half-open containment test.
    pub fn is_inside(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Squared distance from the key center; callers compare against a squared
    /// threshold to avoid a square root per event.
    pub fn squared_distance_from(&self, x: i32, y: i32) -> i64 {
        let (cx, cy) = self.center();
        let dx = i64::from(cx) - i64::from(x);
        let dy = i64::from(cy) - i64::from(y);
        dx * dx + dy * dy
    }

    pub fn binding(&self, gesture: GestureKind) -> Option<&KeyBinding> {
        self.bindings.iter().find(|b| b.gesture == gesture)
    }

    pub fn has_binding(&self, gesture: GestureKind) -> bool {
        self.binding(gesture).is_some()
    }

    /// Code for a gesture, falling back to the plain tap code.
    pub fn code_for(&self, gesture: GestureKind) -> i32 {
        self.binding(gesture)
            .or_else(|| self.binding(GestureKind::Tap))
            .map_or(self.code, |b| b.code)
    }

    pub fn preview_text(&self, gesture: GestureKind) -> Option<&str> {
        self.binding(gesture)
            .and_then(|b| b.preview.as_deref().or(b.text.as_deref()))
            .or(self.label.as_deref())
    }

    pub(super) fn proximity_extent(&self) -> i64 {
        i64::from(self.width.min(self.height)) + i64::from(self.gap)
    }

    pub(super) fn intersects(&self, x: i32, y: i32, width: i32, height: i32) -> bool {
        self.x < x + width && self.x + self.width > x && self.y < y + height && self.y + self.height > y
    }

    pub(super) fn validate(&self, index: usize) -> Result<(), GeometryError> {
        let reason = if self.width <= 0 || self.height <= 0 {
            format!("non-positive size {}x{}", self.width, self.height)
        } else if self.x < 0 || self.y < 0 {
            format!("negative origin ({}, {})", self.x, self.y)
        } else if self.gap < 0 {
            format!("negative gap {}", self.gap)
        } else if self.x.checked_add(self.width).is_none() || self.y.checked_add(self.height).is_none() {
            "extent overflows".to_string()
        } else {
            return Ok(());
        };
        Err(GeometryError::InvalidKey { index, reason })
    }
}
