//! Multi-segment paste assembly.
//!
//! A paste region delivers one hook call (or one fragment part) per
//! segment. The assembler owns hint carry-forward and seal determination:
//! whether a segment is the final one is only known when the next scanner
//! token arrives, so one segment is always held pending.

/// In-flight state for a single paste region. Created when the region
/// opens, consumed when it closes.
#[derive(Debug, Default)]
pub(crate) struct PasteAssembler {
    /// Hint carried forward from the most recent segment that wrote one.
    hint: Option<String>,
    /// The last segment seen, with its effective hint, awaiting delivery.
    pending: Option<(String, Option<String>)>,
}

impl PasteAssembler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record the next segment. Returns the previously pending segment,
    /// which the caller delivers with `seal = false`.
    pub(crate) fn push(
        &mut self,
        content: String,
        hint: Option<String>,
    ) -> Option<(String, Option<String>)> {
        if hint.is_some() {
            self.hint = hint;
        }
        self.pending.replace((content, self.hint.clone()))
    }

    /// Close the region: the final segment, delivered with `seal = true`.
    pub(crate) fn finish(self) -> (String, Option<String>) {
        match self.pending {
            Some(segment) => segment,
            None => (String::new(), self.hint),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_segment() {
        let mut assembler = PasteAssembler::new();
        assert_eq!(assembler.push("a".into(), None), None);
        assert_eq!(assembler.finish(), ("a".into(), None));
    }

    #[test]
    fn test_hint_carried_forward() {
        let mut assembler = PasteAssembler::new();
        assert_eq!(assembler.push("a".into(), Some("expr".into())), None);
        assert_eq!(
            assembler.push("b".into(), None),
            Some(("a".into(), Some("expr".into())))
        );
        assert_eq!(assembler.finish(), ("b".into(), Some("expr".into())));
    }

    #[test]
    fn test_hint_override() {
        let mut assembler = PasteAssembler::new();
        assembler.push("a".into(), Some("expr".into()));
        assert_eq!(
            assembler.push("b".into(), Some("str".into())),
            Some(("a".into(), Some("expr".into())))
        );
        assert_eq!(assembler.finish(), ("b".into(), Some("str".into())));
    }

    #[test]
    fn test_finish_without_segments() {
        let assembler = PasteAssembler::new();
        assert_eq!(assembler.finish(), (String::new(), None));
    }
}
