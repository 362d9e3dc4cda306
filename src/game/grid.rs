use ratatui::layout::{Position, Positions, Rect, Size};

/// The playing field: cells with `0 <= x < width` and `0 <= y < height`
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Bounds {
    pub(crate) width: u16,
    pub(crate) height: u16,
}

impl Bounds {
    pub(crate) fn size(self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub(crate) fn contains(self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub(crate) fn center(self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    #[cfg(test)]
    pub(crate) fn area(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    pub(crate) fn positions(self) -> Positions {
        Rect::from((Position::ORIGIN, self.size())).positions()
    }
}

impl From<Size> for Bounds {
    fn from(size: Size) -> Bounds {
        Bounds {
            width: size.width,
            height: size.height,
        }
    }
}
