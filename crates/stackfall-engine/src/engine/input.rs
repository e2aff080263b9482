/// Logical player actions understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum InputAction {
    /// Rotate the falling shape by 90°.
    Rotate,
    /// Move one column to the left.
    MoveLeft,
    /// Move one column to the right.
    MoveRight,
    /// Move one row down (soft drop).
    SoftDrop,
}

impl InputAction {
    pub const ALL: [Self; 4] = [Self::Rotate, Self::MoveLeft, Self::MoveRight, Self::SoftDrop];

    /// Maps a key name to an action.
    ///
    /// Key names follow the DOM `KeyboardEvent.key` spelling (`"ArrowUp"`,
    /// `"ArrowLeft"`, ...). Any other key yields `None` and must be ignored.
    ///
    /// ```
    /// use stackfall_engine::InputAction;
    ///
    /// assert_eq!(InputAction::from_key_name("ArrowUp"), Some(InputAction::Rotate));
    /// assert_eq!(InputAction::from_key_name("Enter"), None);
    /// ```
    #[must_use]
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowUp" => Some(Self::Rotate),
            "ArrowLeft" => Some(Self::MoveLeft),
            "ArrowRight" => Some(Self::MoveRight),
            "ArrowDown" => Some(Self::SoftDrop),
            _ => None,
        }
    }

    /// Returns the key name bound to this action.
    #[must_use]
    pub const fn key_name(self) -> &'static str {
        match self {
            Self::Rotate => "ArrowUp",
            Self::MoveLeft => "ArrowLeft",
            Self::MoveRight => "ArrowRight",
            Self::SoftDrop => "ArrowDown",
        }
    }

    /// Returns the movement delta, or `None` for rotation.
    #[must_use]
    pub const fn offset(self) -> Option<(i32, i32)> {
        match self {
            Self::Rotate => None,
            Self::MoveLeft => Some((-1, 0)),
            Self::MoveRight => Some((1, 0)),
            Self::SoftDrop => Some((0, 1)),
        }
    }
}
