/// Tri-state truth value of a lifecycle condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Truth {
    True,
    False,
    #[default]
    Unknown,
}

impl Truth {
    /// Kubernetes/Knative status string; anything unrecognized is `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s {
            "True" => Truth::True,
            "False" => Truth::False,
            _ => Truth::Unknown,
        }
    }
}

/// Normalized lifecycle condition. Missing reason/message are empty strings.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Condition {
    pub type_: String,
    pub truth: Truth,
    pub reason: String,
    pub message: String,
}

impl Condition {
    pub fn new(type_: impl Into<String>, truth: Truth) -> Self {
        Self {
            type_: type_.into(),
            truth,
            reason: String::new(),
            message: String::new(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn is_true(&self) -> bool {
        self.truth == Truth::True
    }

    pub fn is_false(&self) -> bool {
        self.truth == Truth::False
    }

    pub fn is_unknown(&self) -> bool {
        self.truth == Truth::Unknown
    }
}

/// First condition of the given type, in reported order.
pub fn find_condition<'a>(
    conditions: &'a [Condition],
    type_: &str,
) -> Option<&'a Condition> {
    conditions.iter().find(|c| c.type_ == type_)
}
