//! Shuffle button of the video break view.

use std::fmt::{Debug, Display, Formatter};

const BUTTON_CLASS: &str = "bg-white text-[#EF4168] rounded-full w-12 h-12 hover:bg-white \
    drop-shadow-lg absolute bottom-1.5 right-0.5 hover:scale-105 transition-all duration-300 \
    cursor-pointer";
const ICON_CLASS: &str = "fa-solid fa-shuffle fa-lg";

/// A stateless trigger for two actions owned by the caller.
///
/// Activating the dial only fetches new videos. The timer is not reset on
/// activation; callers that want that have to call [`ShuffleDial::reset_timer`].
pub struct ShuffleDial<F, R> {
    fetch_new_items: F,
    reset_timer: R,
}

impl<F, R> ShuffleDial<F, R>
where
    F: FnMut(),
    R: FnMut(),
{
    pub fn new(fetch_new_items: F, reset_timer: R) -> Self {
        Self {
            fetch_new_items,
            reset_timer,
        }
    }

    pub fn activate(&mut self) {
        (self.fetch_new_items)();
    }

    pub fn reset_timer(&mut self) {
        (self.reset_timer)();
    }
}

impl<F, R> Display for ShuffleDial<F, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<button type=\"button\" class=\"{BUTTON_CLASS}\"><i class=\"{ICON_CLASS}\" aria-hidden=\"true\"></i></button>"
        )
    }
}

impl<F, R> Debug for ShuffleDial<F, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShuffleDial").finish_non_exhaustive()
    }
}
