//! Clone padding that hides the loop-around seam.
//!
//! The padded sequence is `[clone(last), page 0, .., page n-1, clone(first)]`.
//! Positions index into it: `0` and `n + 1` are the clone slots, `1..=n`
//! are the real pages.

use super::pages::Page;

/// What occupies a position in the padded sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Leading duplicate of the last page.
    CloneOfLast,
    /// A real page, by zero-based page index.
    Real(usize),
    /// Trailing duplicate of the first page.
    CloneOfFirst,
}

impl Slot {
    /// Classify `position` for a carousel with `total_pages` real pages.
    ///
    /// Returns `None` when the position lies outside the padded sequence.
    pub fn at(position: usize, total_pages: usize) -> Option<Self> {
        if total_pages == 0 {
            return None;
        }
        match position {
            0 => Some(Self::CloneOfLast),
            p if p <= total_pages => Some(Self::Real(p - 1)),
            p if p == total_pages + 1 => Some(Self::CloneOfFirst),
            _ => None,
        }
    }

    pub fn is_clone(&self) -> bool {
        !matches!(self, Self::Real(_))
    }

    /// Real position carrying the same content as this slot.
    ///
    /// For a clone this is where the silent reanchor lands.
    pub fn anchor(&self, total_pages: usize) -> usize {
        match *self {
            Self::CloneOfLast => total_pages,
            Self::Real(index) => index + 1,
            Self::CloneOfFirst => 1,
        }
    }
}

/// One entry of the padded sequence.
#[derive(Debug, PartialEq, Eq)]
pub struct PaddedPage<'a, S> {
    pub slot: Slot,
    pub page: Page<'a, S>,
}

impl<S> Clone for PaddedPage<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for PaddedPage<'_, S> {}

/// Surround `pages` with clones of the last and first page.
///
/// An empty input yields an empty sequence: there is nothing to loop over.
pub fn pad<'a, S>(pages: &[Page<'a, S>]) -> Vec<PaddedPage<'a, S>> {
    let (Some(first), Some(last)) = (pages.first(), pages.last()) else {
        return Vec::new();
    };
    let mut padded = Vec::with_capacity(pages.len() + 2);
    padded.push(PaddedPage {
        slot: Slot::CloneOfLast,
        page: *last,
    });
    padded.extend(pages.iter().map(|page| PaddedPage {
        slot: Slot::Real(page.index()),
        page: *page,
    }));
    padded.push(PaddedPage {
        slot: Slot::CloneOfFirst,
        page: *first,
    });
    padded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::pages::group;

    #[test]
    fn four_single_slide_pages_are_wrapped_by_their_clones() {
        let slides = ["0", "1", "2", "3"];
        let pages = group(&slides, 1);
        let padded = pad(&pages);
        let labels: Vec<&str> = padded.iter().map(|p| p.page.slides()[0]).collect();
        assert_eq!(labels, vec!["3", "0", "1", "2", "3", "0"]);
        assert_eq!(padded[0].slot, Slot::CloneOfLast);
        assert_eq!(padded[5].slot, Slot::CloneOfFirst);
        assert_eq!(padded[1].slot, Slot::Real(0));
    }

    #[test]
    fn clones_share_the_slides_of_the_page_they_copy() {
        let slides = [10, 11, 12, 13, 14];
        let pages = group(&slides, 2);
        let padded = pad(&pages);
        assert_eq!(padded.len(), 5);
        assert!(std::ptr::eq(padded[0].page.slides(), pages[2].slides()));
        assert!(std::ptr::eq(padded[4].page.slides(), pages[0].slides()));
    }

    #[test]
    fn single_page_is_its_own_neighbour() {
        let slides = ["only"];
        let padded = pad(&group(&slides, 3));
        assert_eq!(padded.len(), 3);
        assert!(padded.iter().all(|p| p.page.slides() == ["only"]));
    }

    #[test]
    fn nothing_to_pad_without_pages() {
        let pages: Vec<Page<'_, u8>> = Vec::new();
        assert!(pad(&pages).is_empty());
    }

    #[test]
    fn clone_slots_anchor_onto_matching_real_pages() {
        let slides = ["a", "b", "c"];
        let pages = group(&slides, 1);
        let padded = pad(&pages);
        for (position, entry) in padded.iter().enumerate() {
            let slot = Slot::at(position, pages.len()).unwrap();
            assert_eq!(slot, entry.slot);
            let anchor = slot.anchor(pages.len());
            assert_eq!(padded[anchor].page, entry.page);
            assert!(!padded[anchor].slot.is_clone());
        }
        assert_eq!(Slot::at(5, 3), None);
        assert_eq!(Slot::at(0, 0), None);
    }
}
