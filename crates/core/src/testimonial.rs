//! Customer testimonials shown on the home page.

use std::time::Duration;

/// A customer quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Testimonial {
    pub text: &'static str,
    pub author: &'static str,
}

/// How long each testimonial stays on screen.
pub const ROTATION_INTERVAL: Duration = Duration::from_secs(5);

/// The rotation, in display order.
pub const TESTIMONIALS: [Testimonial; 3] = [
    Testimonial {
        text: "Amazing store with incredible deals!",
        author: "Jane Doe",
    },
    Testimonial {
        text: "The best shopping experience online.",
        author: "John Smith",
    },
    Testimonial {
        text: "Great variety and service!",
        author: "Emily Johnson",
    },
];

impl Testimonial {
    /// The testimonial at rotation position `index`, wrapping around the list.
    #[must_use]
    pub const fn at(index: usize) -> Self {
        TESTIMONIALS[index % TESTIMONIALS.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_wraps() {
        assert_eq!(Testimonial::at(0).author, "Jane Doe");
        assert_eq!(Testimonial::at(2).author, "Emily Johnson");
        assert_eq!(Testimonial::at(3), Testimonial::at(0));
        assert_eq!(Testimonial::at(7), Testimonial::at(1));
    }
}
