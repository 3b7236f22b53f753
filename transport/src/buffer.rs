/// An owned byte region plus a usable prefix length.
///
/// Outbound cells are handed to the transport by the session layer (which
/// owns the pool they came from, if any); the transport's only obligation is
/// to make sure every cell it accepts is eventually released — dropping it
/// satisfies that contract; there is nothing further to return to a pool at
/// this layer since no pooling is implemented here (see `DESIGN.md`).
/// Inbound cells are always freshly allocated by the read loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferCell {
    data: Vec<u8>,
}

impl BufferCell {
    #[must_use]
    pub const fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl From<Vec<u8>> for BufferCell {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}
