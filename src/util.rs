use crate::consts;
use enum_map::Enum;
use ratatui::layout::{Flex, Layout, Rect, Size};

/// Convenience methods for stepping through the variants of a fieldless
/// [`Enum`] in declaration order
pub(crate) trait EnumExt: Enum + Copy {
    fn min() -> Self {
        Self::from_usize(0)
    }

    fn max() -> Self {
        Self::from_usize(Self::LENGTH - 1)
    }

    fn next(self) -> Option<Self> {
        let i = self.into_usize() + 1;
        (i < Self::LENGTH).then(|| Self::from_usize(i))
    }

    fn prev(self) -> Option<Self> {
        self.into_usize().checked_sub(1).map(Self::from_usize)
    }

    fn iter() -> impl Iterator<Item = Self> {
        (0..Self::LENGTH).map(Self::from_usize)
    }
}

impl<T: Enum + Copy> EnumExt for T {}

/// Return the rectangle of size [`consts::DISPLAY_SIZE`] centered in
/// `buffer_area`
pub(crate) fn get_display_area(buffer_area: Rect) -> Rect {
    center_rect(buffer_area, consts::DISPLAY_SIZE)
}

/// Return a rectangle of (at most) `size` centered in `area`
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [area] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([size.height])
        .flex(Flex::Center)
        .areas(area);
    area
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
    enum Abc {
        A,
        B,
        C,
    }

    #[test]
    fn enum_ext_bounds() {
        assert_eq!(Abc::min(), Abc::A);
        assert_eq!(Abc::max(), Abc::C);
        assert_eq!(Abc::A.prev(), None);
        assert_eq!(Abc::C.next(), None);
        assert_eq!(Abc::B.next(), Some(Abc::C));
        assert_eq!(Abc::B.prev(), Some(Abc::A));
        assert_eq!(Abc::iter().collect::<Vec<_>>(), [Abc::A, Abc::B, Abc::C]);
    }

    #[rstest]
    #[case(Rect::new(0, 0, 80, 24), Size::new(20, 6), Rect::new(30, 9, 20, 6))]
    #[case(Rect::new(0, 0, 100, 30), Size::new(80, 24), Rect::new(10, 3, 80, 24))]
    #[case(Rect::new(5, 5, 10, 4), Size::new(20, 6), Rect::new(5, 5, 10, 4))]
    fn test_center_rect(#[case] area: Rect, #[case] size: Size, #[case] r: Rect) {
        assert_eq!(center_rect(area, size), r);
    }
}
