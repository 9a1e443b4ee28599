use serde::{Deserialize, Serialize};

/// Handle to a control registered in a [`Panel`](super::Panel).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct ControlId(pub u32);

/// Handle to a folder registered in a [`Panel`](super::Panel).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct FolderId(pub u32);

/// What kind of widget a control is, and the constraints on its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlKind {
    /// Numeric slider clamped to `[min, max]`.
    Range {
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
        /// Slider increment, `None` for continuous.
        step: Option<f64>,
    },
    /// Checkbox.
    Boolean,
    /// Dropdown over a fixed list of options.
    Enumerated {
        /// Selectable values, in display order.
        options: Vec<String>,
    },
    /// Button that fires an action and carries no value.
    Action,
}

/// The value currently held by a control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// Selected option of an enumerated control.
    Choice(String),
    /// No value (action controls).
    None,
}

impl ControlValue {
    /// Loose truthiness: non-zero numbers and non-empty choices are true.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Choice(s) => !s.is_empty(),
            Self::None => false,
        }
    }

    /// Numeric view of the value. Booleans map to 0/1.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

impl From<bool> for ControlValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for ControlValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<f32> for ControlValue {
    fn from(n: f32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl ControlKind {
    /// Range kind without a step.
    #[must_use]
    pub fn range(min: f64, max: f64) -> Self {
        Self::Range {
            min,
            max,
            step: None,
        }
    }

    /// Coerce `value` into something this kind can hold.
    ///
    /// Returns `None` when the value cannot be represented (wrong type or an
    /// option that is not listed).
    #[must_use]
    pub fn coerce(&self, value: ControlValue) -> Option<ControlValue> {
        match self {
            Self::Range { min, max, .. } => {
                let n = value.as_number()?;
                if n.is_nan() {
                    return None;
                }
                Some(ControlValue::Number(n.max(*min).min(*max)))
            }
            Self::Boolean => match value {
                ControlValue::Bool(_) => Some(value),
                ControlValue::Number(_) => {
                    Some(ControlValue::Bool(value.is_truthy()))
                }
                _ => None,
            },
            Self::Enumerated { options } => match value {
                ControlValue::Choice(ref s) if options.contains(s) => {
                    Some(value)
                }
                _ => None,
            },
            Self::Action => match value {
                ControlValue::None => Some(value),
                _ => None,
            },
        }
    }
}

/// A single registered control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control {
    /// Stable handle.
    pub id: ControlId,
    /// Key of the bound parameter (e.g. `"offset"`).
    pub property: String,
    /// Display name shown next to the widget.
    pub name: String,
    /// Widget kind and value constraints.
    pub kind: ControlKind,
    /// Current value.
    pub value: ControlValue,
    /// Owning folder, `None` for root controls.
    #[serde(skip)]
    pub folder: Option<FolderId>,
    /// Value revision of the last accepted value change, 0 if never set.
    #[serde(skip)]
    pub changed_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_clamps_and_accepts_bools() {
        let kind = ControlKind::range(0.0, 4.0);
        assert_eq!(
            kind.coerce(ControlValue::Number(9.0)),
            Some(ControlValue::Number(4.0))
        );
        assert_eq!(
            kind.coerce(ControlValue::Number(-1.0)),
            Some(ControlValue::Number(0.0))
        );
        assert_eq!(
            kind.coerce(ControlValue::Bool(true)),
            Some(ControlValue::Number(1.0))
        );
        assert_eq!(kind.coerce(ControlValue::Number(f64::NAN)), None);
        assert_eq!(kind.coerce(ControlValue::Choice("a".into())), None);
    }

    #[test]
    fn boolean_takes_numeric_truthiness() {
        let kind = ControlKind::Boolean;
        assert_eq!(
            kind.coerce(ControlValue::Number(2.5)),
            Some(ControlValue::Bool(true))
        );
        assert_eq!(
            kind.coerce(ControlValue::Number(0.0)),
            Some(ControlValue::Bool(false))
        );
        assert_eq!(kind.coerce(ControlValue::None), None);
    }

    #[test]
    fn enumerated_requires_listed_option() {
        let kind = ControlKind::Enumerated {
            options: vec!["front".into(), "back".into()],
        };
        assert!(kind.coerce(ControlValue::Choice("back".into())).is_some());
        assert!(kind.coerce(ControlValue::Choice("side".into())).is_none());
    }

    #[test]
    fn values_deserialize_from_plain_json() {
        let v: ControlValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, ControlValue::Bool(true));
        let v: ControlValue = serde_json::from_str("3.5").unwrap();
        assert_eq!(v, ControlValue::Number(3.5));
        let v: ControlValue = serde_json::from_str("null").unwrap();
        assert_eq!(v, ControlValue::None);
        let v: ControlValue = serde_json::from_str("\"x\"").unwrap();
        assert_eq!(v, ControlValue::Choice("x".into()));
    }

    #[test]
    fn kind_serializes_with_type_tag() {
        let json = serde_json::to_value(ControlKind::range(0.0, 2.0)).unwrap();
        assert_eq!(json["type"], "range");
        assert_eq!(json["max"], 2.0);
        let json = serde_json::to_value(ControlKind::Boolean).unwrap();
        assert_eq!(json["type"], "boolean");
    }
}
