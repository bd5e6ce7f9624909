use crate::foundation::error::{BorderError, BorderResult};

/// Storage width of a search index, chosen from the largest pixel index a buffer needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum IndexWidth {
    /// One byte per index.
    U8,
    /// Two bytes per index.
    U16,
    /// Four bytes per index.
    U32,
    /// Eight bytes per index.
    U64,
}

impl IndexWidth {
    /// Narrowest width able to index every pixel of a `len`-pixel buffer.
    pub fn for_len(len: usize) -> BorderResult<Self> {
        // Only fails where `usize` is wider than 64 bits.
        let max = u64::try_from(len.saturating_sub(1))
            .map_err(|_| BorderError::IndexOverflow { len })?;
        Ok(if max <= u64::from(u8::MAX) {
            Self::U8
        } else if max <= u64::from(u16::MAX) {
            Self::U16
        } else if max <= u64::from(u32::MAX) {
            Self::U32
        } else {
            Self::U64
        })
    }

    /// Bytes per stored index.
    pub fn bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
            Self::U64 => 8,
        }
    }
}

trait IndexWord: Copy {
    fn from_index(i: usize) -> Self;
    fn index(self) -> usize;
}

macro_rules! index_word {
    ($($t:ty),*) => {$(
        impl IndexWord for $t {
            #[inline]
            fn from_index(i: usize) -> Self {
                debug_assert!(<$t>::try_from(i).is_ok());
                i as $t
            }

            #[inline]
            fn index(self) -> usize {
                self as usize
            }
        }
    )*};
}

index_word!(u8, u16, u32, u64);

/// Growable list of pixel positions stored at a fixed [`IndexWidth`].
#[derive(Clone, Debug)]
pub(crate) enum IndexBuf {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
}

macro_rules! dispatch {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            IndexBuf::U8($v) => $body,
            IndexBuf::U16($v) => $body,
            IndexBuf::U32($v) => $body,
            IndexBuf::U64($v) => $body,
        }
    };
}

impl IndexBuf {
    pub(crate) fn new(width: IndexWidth) -> Self {
        match width {
            IndexWidth::U8 => Self::U8(Vec::new()),
            IndexWidth::U16 => Self::U16(Vec::new()),
            IndexWidth::U32 => Self::U32(Vec::new()),
            IndexWidth::U64 => Self::U64(Vec::new()),
        }
    }

    pub(crate) fn width(&self) -> IndexWidth {
        match self {
            Self::U8(_) => IndexWidth::U8,
            Self::U16(_) => IndexWidth::U16,
            Self::U32(_) => IndexWidth::U32,
            Self::U64(_) => IndexWidth::U64,
        }
    }

    pub(crate) fn len(&self) -> usize {
        dispatch!(self, v => v.len())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn clear(&mut self) {
        dispatch!(self, v => v.clear())
    }

    #[inline]
    pub(crate) fn push(&mut self, i: usize) {
        dispatch!(self, v => v.push(IndexWord::from_index(i)))
    }

    /// Visit every stored position in insertion order.
    #[inline]
    pub(crate) fn for_each(&self, mut f: impl FnMut(usize)) {
        dispatch!(self, v => {
            for &w in v.iter() {
                f(w.index());
            }
        })
    }

    pub(crate) fn to_vec(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.len());
        self.for_each(|i| out.push(i));
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/growth/index.rs"]
mod tests;
