use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Hash, Eq, PartialEq, Fromln, AsRefln)]
pub struct BookIsbn(String);

impl BookIsbn {
    pub fn new(isbn: impl Into<String>) -> Self {
        Self(isbn.into())
    }
}
