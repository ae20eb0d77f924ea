use alloc::rc::Rc;
use alloc::vec::Vec;

/// Sequential input a parser can read from.
///
/// A stream is an immutable view: taking the first element yields a new
/// view of the rest and leaves `self` untouched, so a parser can always go
/// back to a state it has kept.
pub trait Stream: Clone {
    type Item: Clone;

    /// The first element and the stream without it.
    fn uncons(&self) -> Option<(Self::Item, Self)>;

    fn peek(&self) -> Option<Self::Item> {
        self.uncons().map(|(item, _)| item)
    }

    fn is_empty(&self) -> bool {
        self.peek().is_none()
    }
}

impl<'a> Stream for &'a str {
    type Item = char;

    fn uncons(&self) -> Option<(char, Self)> {
        let mut chars = self.chars();
        let c = chars.next()?;
        Some((c, chars.as_str()))
    }

    fn peek(&self) -> Option<char> {
        self.chars().next()
    }

    fn is_empty(&self) -> bool {
        str::is_empty(self)
    }
}

impl<'a, T: Clone> Stream for &'a [T] {
    type Item = T;

    fn uncons(&self) -> Option<(T, Self)> {
        self.split_first().map(|(first, rest)| (first.clone(), rest))
    }

    fn is_empty(&self) -> bool {
        <[T]>::is_empty(self)
    }
}

/// An owned, shared buffer read through an index cursor.
///
/// Useful when the input is produced at runtime (e.g. by a lexer) and
/// cannot be borrowed for the whole parse. Cloning and dropping the first
/// element are O(1).
#[derive(Debug)]
pub struct BufferStream<T> {
    buffer: Rc<[T]>,
    offset: usize,
}

impl<T> BufferStream<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            buffer: Rc::from(items),
            offset: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> &[T] {
        &self.buffer[self.offset..]
    }
}

impl<T> Clone for BufferStream<T> {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            offset: self.offset,
        }
    }
}

impl<T> From<Vec<T>> for BufferStream<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T: PartialEq> PartialEq for BufferStream<T> {
    fn eq(&self, other: &Self) -> bool {
        self.remaining() == other.remaining()
    }
}

impl<T: Clone> Stream for BufferStream<T> {
    type Item = T;

    fn uncons(&self) -> Option<(T, Self)> {
        let item = self.buffer.get(self.offset)?.clone();
        Some((
            item,
            Self {
                buffer: self.buffer.clone(),
                offset: self.offset + 1,
            },
        ))
    }

    fn is_empty(&self) -> bool {
        self.offset >= self.buffer.len()
    }
}
