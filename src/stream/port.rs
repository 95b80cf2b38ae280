/// One-slot handshake between a producer and a consumer stepped by the same scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port<T> {
    slot: Option<T>,
}

impl<T> Default for Port<T> {
    fn default() -> Port<T> {
        Port::new()
    }
}

impl<T> Port<T> {
    #[inline]
    pub fn new() -> Port<T> {
        Port { slot: None }
    }

    /// Places a value in the port, or hands it back if the previous one has not been taken
    #[inline]
    pub fn offer(&mut self, value: T) -> Result<(), T> {
        if self.slot.is_some() {
            return Err(value);
        }

        self.slot = Some(value);

        Ok(())
    }

    #[inline]
    pub fn take(&mut self) -> Option<T> {
        self.slot.take()
    }

    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.slot.as_ref()
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.slot.is_none()
    }

    /// Fills a port already known to be free
    #[inline]
    pub(crate) fn fill(&mut self, value: T) {
        debug_assert!(self.slot.is_none(), "Port overwritten while occupied");

        self.slot = Some(value);
    }
}

#[cfg(test)]
mod test {
    use super::Port;

    #[test]
    fn test_offer_refuses_when_occupied() {
        let mut port = Port::new();

        assert!(port.is_free());
        assert_eq!(port.offer(1), Ok(()));
        assert_eq!(port.offer(2), Err(2));
        assert_eq!(port.peek(), Some(&1));
        assert_eq!(port.take(), Some(1));
        assert_eq!(port.take(), None);
        assert_eq!(port.offer(2), Ok(()));
    }
}
