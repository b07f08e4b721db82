use std::iter::FusedIterator;

use super::StringView;

/// An iterator over the parts of a [`StringView`] separated by a delimiter. See
/// [`StringView::split`].
#[derive(Debug, Clone)]
pub struct Split<'a> {
    rest: Option<StringView<'a>>,
    delim: &'a [u8],
}

impl<'a> Split<'a> {
    pub(crate) fn new(view: StringView<'a>, delim: &'a [u8]) -> Split<'a> {
        Split {
            rest: Some(view),
            delim,
        }
    }
}

impl<'a> Iterator for Split<'a> {
    type Item = StringView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        if self.delim.is_empty() {
            self.rest = None;
            return Some(rest);
        }

        match rest.split_once(self.delim) {
            Some((before, after)) => {
                self.rest = Some(after);
                Some(before)
            },
            None => {
                self.rest = None;
                Some(rest)
            },
        }
    }
}

impl FusedIterator for Split<'_> {}
