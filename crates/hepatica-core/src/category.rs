//! Diagnostic category map and arg-max selection over classifier output.

/// Label shown when the classifier's best index has no category.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// The five diagnostic outcomes, indexed as the model was trained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    BloodDonor,
    SuspectBloodDonor,
    Hepatitis,
    Fibrosis,
    Cirrhosis,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::BloodDonor,
        Self::SuspectBloodDonor,
        Self::Hepatitis,
        Self::Fibrosis,
        Self::Cirrhosis,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::BloodDonor => "Blood Donor",
            Self::SuspectBloodDonor => "Suspect Blood Donor",
            Self::Hepatitis => "Hepatitis",
            Self::Fibrosis => "Fibrosis",
            Self::Cirrhosis => "Cirrhosis",
        }
    }
}

/// Display label for a class index, falling back to [`UNKNOWN_LABEL`].
pub fn label_for_index(index: usize) -> &'static str {
    Category::from_index(index)
        .map(|c| c.label())
        .unwrap_or(UNKNOWN_LABEL)
}

/// Index of the first maximum. NaN entries are skipped.
///
/// Returns `None` for an empty slice or one holding only NaN.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_for_known_indices() {
        assert_eq!(label_for_index(0), "Blood Donor");
        assert_eq!(label_for_index(1), "Suspect Blood Donor");
        assert_eq!(label_for_index(2), "Hepatitis");
        assert_eq!(label_for_index(3), "Fibrosis");
        assert_eq!(label_for_index(4), "Cirrhosis");
    }

    #[test]
    fn out_of_range_index_is_unknown() {
        assert_eq!(label_for_index(5), UNKNOWN_LABEL);
        assert_eq!(label_for_index(usize::MAX), UNKNOWN_LABEL);
    }

    #[test]
    fn argmax_picks_largest() {
        assert_eq!(argmax(&[0.1, 0.2, 0.6, 0.05, 0.05]), Some(2));
    }

    #[test]
    fn argmax_ties_pick_lowest_index() {
        assert_eq!(argmax(&[0.1, 0.4, 0.1, 0.4, 0.0]), Some(1));
        assert_eq!(argmax(&[0.2; 5]), Some(0));
    }

    #[test]
    fn argmax_skips_nan() {
        assert_eq!(argmax(&[f32::NAN, 0.3, 0.7]), Some(2));
        assert_eq!(argmax(&[0.3, f32::NAN, 0.1]), Some(0));
    }

    #[test]
    fn argmax_empty() {
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn argmax_all_nan_has_no_winner() {
        assert_eq!(argmax(&[f32::NAN; 5]), None);
    }
}
