//! Partitioning of the flat slide list into fixed-size pages.

/// A contiguous run of slides shown together as one navigable unit.
///
/// Pages borrow from the caller's slide list; clones produced by
/// [`pad`](super::padding::pad) share the same slice.
#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, S> {
    index: usize,
    slides: &'a [S],
}

// Manual impls so `Page` stays `Copy` without requiring `S: Copy`.
impl<S> Clone for Page<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Page<'_, S> {}

impl<'a, S> Page<'a, S> {
    pub(crate) fn new(index: usize, slides: &'a [S]) -> Self {
        Self { index, slides }
    }

    /// Zero-based index of this page among the real pages.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn slides(&self) -> &'a [S] {
        self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// Shape of a slide list once grouped into pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    slide_count: usize,
    slides_to_show: usize,
    total_pages: usize,
}

impl Layout {
    /// `slides_to_show` below one is treated as one.
    pub fn new(slide_count: usize, slides_to_show: usize) -> Self {
        let slides_to_show = slides_to_show.max(1);
        Self {
            slide_count,
            slides_to_show,
            total_pages: slide_count.div_ceil(slides_to_show),
        }
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn slides_to_show(&self) -> usize {
        self.slides_to_show
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Length of the padded sequence: two clone slots around the real pages,
    /// or nothing at all when there is no page to clone.
    pub fn padded_len(&self) -> usize {
        if self.is_inert() {
            0
        } else {
            self.total_pages + 2
        }
    }

    /// An inert layout has no pages and accepts no navigation.
    pub fn is_inert(&self) -> bool {
        self.total_pages == 0
    }
}

/// Chunk `slides` into pages of `slides_to_show`, preserving order.
///
/// The last page holds the remainder when the count does not divide evenly.
pub fn group<S>(slides: &[S], slides_to_show: usize) -> Vec<Page<'_, S>> {
    slides
        .chunks(slides_to_show.max(1))
        .enumerate()
        .map(|(index, slides)| Page { index, slides })
        .collect()
}
