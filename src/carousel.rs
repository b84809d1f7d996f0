//! Pure carousel core: page grouping, loop padding and the transition state machine.

pub mod machine;
pub mod padding;
pub mod pages;
pub mod timer;

pub use machine::{Carousel, CarouselOptions, INTERACTION_COOLDOWN, Phase};
pub use padding::{PaddedPage, Slot, pad};
pub use pages::{Layout, Page, group};
