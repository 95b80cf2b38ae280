/// Integer pixel position, x to the right and y down the rows of the framebuffer
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub x: u32,
    pub y: u32,
}

impl Coordinate {
    #[inline]
    pub fn new(x: u32, y: u32) -> Coordinate {
        Coordinate { x, y }
    }
}

#[cfg(test)]
mod test {
    use super::Coordinate;
    use crate::geometry::Dimensions;

    #[test]
    fn test_bounds_are_exclusive() {
        let dims = Dimensions::new(16, 8);

        assert!(dims.in_bounds(Coordinate::new(0, 0)));
        assert!(dims.in_bounds(Coordinate::new(15, 7)));
        assert!(!dims.in_bounds(Coordinate::new(16, 0)));
        assert!(!dims.in_bounds(Coordinate::new(0, 8)));
        assert_eq!(Dimensions::new(0, 8).validate(), Err(crate::error::RenderError::InvalidFramebuffer(0, 8)));
    }
}
