use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter, Write};
use std::ops::Deref;
use std::str::{self, Utf8Error};

use super::{Split, compare, find, rfind};
use crate::collections::contiguous::SharedString;

/// A borrowed view of a run of bytes, usually obtained from [`SharedString::view`] or
/// [`SharedString::slice`].
///
/// Unlike the string it views, a StringView isn't null-terminated.
///
/// # Examples
/// ```
/// # use shared_lib::collections::contiguous::StringView;
/// let view = StringView::from("  key = value ");
/// let (key, value) = view.split_once("=").unwrap();
/// assert_eq!(key.trim(), "key");
/// assert_eq!(value.trim(), "value");
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StringView<'a> {
    bytes: &'a [u8],
}

impl<'a> StringView<'a> {
    pub const fn new(bytes: &'a [u8]) -> StringView<'a> {
        StringView {
            bytes,
        }
    }

    /// Returns the viewed bytes with the full lifetime of the underlying storage.
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Interprets the viewed bytes as UTF-8.
    ///
    /// # Errors
    /// Returns a [`Utf8Error`] if the bytes aren't valid UTF-8.
    pub fn as_str(&self) -> Result<&'a str, Utf8Error> {
        str::from_utf8(self.bytes)
    }

    /// Returns a view of the first `n` bytes.
    pub fn first_n(&self, n: usize) -> StringView<'a> {
        StringView::new(&self.bytes[..n.min(self.bytes.len())])
    }

    /// Returns a view of everything except the first `n` bytes.
    pub fn without_first_n(&self, n: usize) -> StringView<'a> {
        StringView::new(&self.bytes[n.min(self.bytes.len())..])
    }

    /// Returns a view of the last `n` bytes.
    pub fn last_n(&self, n: usize) -> StringView<'a> {
        let len = self.bytes.len();
        StringView::new(&self.bytes[len - n.min(len)..])
    }

    /// Returns a view of everything except the last `n` bytes.
    pub fn without_last_n(&self, n: usize) -> StringView<'a> {
        let len = self.bytes.len();
        StringView::new(&self.bytes[..len - n.min(len)])
    }

    /// Returns a view of `len` bytes starting at `from`.
    ///
    /// # Examples
    /// ```
    /// # use shared_lib::collections::contiguous::StringView;
    /// let view = StringView::from("hello world");
    /// assert_eq!(view.substr(6, 5), "world");
    /// assert_eq!(view.substr(6, 100), "world");
    /// assert_eq!(view.substr(100, 5), "");
    /// ```
    pub fn substr(&self, from: usize, len: usize) -> StringView<'a> {
        let from = from.min(self.bytes.len());
        let len = len.min(self.bytes.len() - from);
        StringView::new(&self.bytes[from..from + len])
    }

    /// Returns the index of the first occurrence of `needle`.
    pub fn find(&self, needle: impl AsRef<[u8]>) -> Option<usize> {
        find(self.bytes, needle.as_ref())
    }

    /// Returns the index of the last occurrence of `needle`.
    pub fn rfind(&self, needle: impl AsRef<[u8]>) -> Option<usize> {
        rfind(self.bytes, needle.as_ref())
    }

    /// Returns the index of the first occurrence of `byte`.
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        self.bytes.iter().position(|b| *b == byte)
    }

    pub fn contains(&self, needle: impl AsRef<[u8]>) -> bool {
        self.find(needle).is_some()
    }

    pub fn starts_with(&self, prefix: impl AsRef<[u8]>) -> bool {
        self.bytes.starts_with(prefix.as_ref())
    }

    pub fn ends_with(&self, suffix: impl AsRef<[u8]>) -> bool {
        self.bytes.ends_with(suffix.as_ref())
    }

    /// Splits the view around the first occurrence of `delim`, returning the bytes before and after
    /// it. Returns [`None`] if `delim` doesn't occur.
    pub fn split_once(&self, delim: impl AsRef<[u8]>) -> Option<(StringView<'a>, StringView<'a>)> {
        let delim = delim.as_ref();
        let index = find(self.bytes, delim)?;
        Some((self.first_n(index), self.without_first_n(index + delim.len())))
    }

    /// Returns an iterator over the views separated by `delim`. An empty delimiter yields the whole
    /// view once.
    ///
    /// # Examples
    /// ```
    /// # use shared_lib::collections::contiguous::StringView;
    /// let parts: Vec<_> = StringView::from("a,b,,c").split(b",").collect();
    /// assert_eq!(parts, ["a", "b", "", "c"]);
    /// ```
    pub fn split(&self, delim: &'a [u8]) -> Split<'a> {
        Split::new(*self, delim)
    }

    /// Removes leading ASCII whitespace.
    pub fn trim_start(&self) -> StringView<'a> {
        StringView::new(self.bytes.trim_ascii_start())
    }

    /// Removes trailing ASCII whitespace.
    pub fn trim_end(&self) -> StringView<'a> {
        StringView::new(self.bytes.trim_ascii_end())
    }

    /// Removes leading and trailing ASCII whitespace.
    pub fn trim(&self) -> StringView<'a> {
        StringView::new(self.bytes.trim_ascii())
    }

    /// Copies the viewed bytes into a new [`SharedString`].
    pub fn to_shared(&self) -> SharedString {
        SharedString::from_bytes(self.bytes)
    }
}

impl Deref for StringView<'_> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.bytes
    }
}

impl AsRef<[u8]> for StringView<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for StringView<'a> {
    fn from(value: &'a [u8]) -> Self {
        StringView::new(value)
    }
}

impl<'a> From<&'a str> for StringView<'a> {
    fn from(value: &'a str) -> Self {
        StringView::new(value.as_bytes())
    }
}

impl<'a> From<&'a SharedString> for StringView<'a> {
    fn from(value: &'a SharedString) -> Self {
        value.view()
    }
}

impl PartialEq<str> for StringView<'_> {
    fn eq(&self, other: &str) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl PartialEq<&str> for StringView<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl PartialEq<[u8]> for StringView<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.bytes == other
    }
}

impl PartialOrd for StringView<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StringView<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self.bytes, other.bytes)
    }
}

impl Display for StringView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&String::from_utf8_lossy(self.bytes), f)
    }
}

impl Debug for StringView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_escaped(self.bytes, f)
    }
}

/// Writes `bytes` as a quoted string, escaping anything that isn't printable ASCII.
pub(crate) fn write_escaped(bytes: &[u8], f: &mut Formatter<'_>) -> fmt::Result {
    f.write_char('"')?;
    for byte in bytes {
        write!(f, "{}", byte.escape_ascii())?;
    }
    f.write_char('"')
}
