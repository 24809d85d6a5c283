//! Semantic names of attribute slots.

use std::any::Any;

use super::Object;
use crate::io::{Input, Output};
use crate::util::Result;

/// Ordered list of classification names, one per attribute array.
///
/// The position of a name is the shader location of its array. Names need
/// not be unique; [`index`](Self::index) with an increasing start location
/// walks duplicates in order.
///
/// A mapping is not a [`Data`](super::Data) buffer, so it cannot be a
/// [`SharedData`](super::SharedData) stream root or object reference. It is
/// serialized inline, as a field of whatever owns it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArrayMapping {
    pub classifications: Vec<String>,
}

impl ArrayMapping {
    pub const VERTEX: &'static str = "vertex";
    pub const COLOR: &'static str = "color";
    pub const NORMAL: &'static str = "normal";
    pub const TEXCOORD: &'static str = "texcoord";

    pub fn new() -> Self {
        Self::default()
    }

    /// Append a classification; its location is the previous length.
    pub fn push(&mut self, name: impl Into<String>) -> u32 {
        self.classifications.push(name.into());
        (self.classifications.len() - 1) as u32
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classifications.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classifications.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classifications.iter().map(String::as_str)
    }

    /// Location of the first `name` at or after `start_location`.
    ///
    /// Returns `(false, len)` when there is none.
    pub fn index(&self, name: &str, start_location: u32) -> (bool, u32) {
        let start = start_location as usize;
        self.classifications
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, c)| c.as_str() == name)
            .map_or((false, self.classifications.len() as u32), |(i, _)| (true, i as u32))
    }
}

impl<S: Into<String>> FromIterator<S> for ArrayMapping {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            classifications: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Object for ArrayMapping {
    fn class_name(&self) -> &'static str {
        "ArrayMapping"
    }

    fn read(&mut self, input: &mut dyn Input) -> Result<()> {
        self.classifications = input.read_strings("Classifications")?;
        Ok(())
    }

    fn write(&self, output: &mut dyn Output) -> Result<()> {
        output.write_strings("Classifications", &self.classifications)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
