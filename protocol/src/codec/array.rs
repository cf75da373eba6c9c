//! The array rule engine.
//!
//! Every nested sequence in the wire format (inputs, outputs, unlock
//! conditions, feature blocks, native tokens) is governed by an
//! [`ArrayRules`] value: count bounds, an optional per-element guard that
//! restricts which variants may appear, and an ordering/uniqueness mode.
//!
//! The engine is generic and knows nothing about categories. Callers inject
//! plain `fn` values, so rule sets can be `const`s living next to the type
//! that owns the sequence.

use super::{Codec, Reader, ValidationMode, Writer};
use crate::error::{Error, Result};

/// Restricts the variants allowed at a position.
///
/// `read` sees the peeked type code before the element is decoded; `write`
/// sees the element before it is encoded.
pub struct ElementGuard<T> {
    pub read: fn(u32) -> Result<()>,
    pub write: fn(&T) -> Result<()>,
}

impl<T> Clone for ElementGuard<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ElementGuard<T> {}

/// Uniqueness / ordering rule for a sequence.
pub enum ArrayMode<T> {
    /// No constraint beyond the count.
    None,
    /// No two elements may be equivalent under the relation.
    Unique(fn(&T, &T) -> bool),
    /// Keys must be strictly ascending (which implies uniqueness).
    Ascending(fn(&T) -> u32),
}

impl<T> Clone for ArrayMode<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArrayMode<T> {}

/// The complete rule set for one kind of sequence.
pub struct ArrayRules<T> {
    /// Name used in error messages.
    pub context: &'static str,
    pub min: usize,
    pub max: usize,
    pub guard: Option<ElementGuard<T>>,
    pub mode: ArrayMode<T>,
}

impl<T> Clone for ArrayRules<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArrayRules<T> {}

impl<T> ArrayRules<T> {
    pub fn check_count(&self, count: usize) -> Result<()> {
        if count < self.min || count > self.max {
            return Err(Error::CountOutOfBounds {
                context: self.context,
                count,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    pub fn check_read(&self, code: u32) -> Result<()> {
        match &self.guard {
            Some(guard) => (guard.read)(code),
            None => Ok(()),
        }
    }

    pub fn check_write(&self, item: &T) -> Result<()> {
        match &self.guard {
            Some(guard) => (guard.write)(item),
            None => Ok(()),
        }
    }

    /// Applies the uniqueness / ordering rule, reporting the position of the
    /// first offending element.
    pub fn check_mode(&self, items: &[T]) -> Result<()> {
        match self.mode {
            ArrayMode::None => Ok(()),
            ArrayMode::Unique(same) => {
                for (position, item) in items.iter().enumerate() {
                    if items[..position].iter().any(|earlier| same(earlier, item)) {
                        return Err(Error::DuplicateReference {
                            context: self.context,
                            position,
                        });
                    }
                }
                Ok(())
            }
            ArrayMode::Ascending(key) => {
                for (i, pair) in items.windows(2).enumerate() {
                    let (prev, next) = (key(&pair[0]), key(&pair[1]));
                    if next == prev {
                        return Err(Error::DuplicateReference {
                            context: self.context,
                            position: i + 1,
                        });
                    }
                    if next < prev {
                        return Err(Error::OrderViolation {
                            context: self.context,
                            position: i + 1,
                        });
                    }
                }
                Ok(())
            }
        }
    }

    /// Count, per-element write guard, then mode. This is what essence
    /// assembly runs regardless of any codec mode.
    pub fn validate(&self, items: &[T]) -> Result<()> {
        self.check_count(items.len())?;
        for item in items {
            self.check_write(item)?;
        }
        self.check_mode(items)
    }
}

/// Reads a `u16`-counted sequence.
///
/// Under `Perform` the count is checked before any element is read, the
/// read guard runs on each peeked type code, and the mode runs once all
/// elements are in.
pub fn decode_array<T: Codec>(
    reader: &mut Reader<'_>,
    rules: &ArrayRules<T>,
    mode: ValidationMode,
) -> Result<Vec<T>> {
    let count = reader.read_u16(rules.context)? as usize;
    if mode.validates() {
        rules.check_count(count)?;
    }

    // The count is untrusted; don't let it size the allocation.
    let mut items = Vec::with_capacity(count.min(reader.remaining()));
    for _ in 0..count {
        if mode.validates() && rules.guard.is_some() {
            let code = reader.peek_u8(rules.context)?;
            rules.check_read(code as u32)?;
        }
        items.push(T::decode_from(reader, mode)?);
    }

    if mode.validates() {
        rules.check_mode(&items)?;
    }
    Ok(items)
}

/// Writes a `u16`-counted sequence, validating it first under `Perform`.
pub fn encode_array<T: Codec>(
    writer: &mut Writer,
    items: &[T],
    rules: &ArrayRules<T>,
    mode: ValidationMode,
) -> Result<()> {
    if items.len() > u16::MAX as usize {
        return Err(Error::CountOutOfBounds {
            context: rules.context,
            count: items.len(),
            min: 0,
            max: u16::MAX as usize,
        });
    }
    if mode.validates() {
        rules.validate(items)?;
    }

    writer.write_u16(items.len() as u16);
    for item in items {
        item.encode_into(writer, mode)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A one-byte "typed" element: the byte is its own type code.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Tagged(u8);

    impl Codec for Tagged {
        fn encode_into(&self, writer: &mut Writer, _mode: ValidationMode) -> Result<()> {
            writer.write_u8(self.0);
            Ok(())
        }

        fn decode_from(reader: &mut Reader<'_>, _mode: ValidationMode) -> Result<Self> {
            Ok(Tagged(reader.read_u8("tagged")?))
        }
    }

    fn only_even(code: u32) -> Result<()> {
        if code % 2 == 0 {
            Ok(())
        } else {
            Err(Error::TypeMismatch {
                context: "tagged",
                actual: code,
            })
        }
    }

    fn only_even_item(item: &Tagged) -> Result<()> {
        only_even(item.0 as u32)
    }

    const UNIQUE: ArrayRules<Tagged> = ArrayRules {
        context: "tagged",
        min: 1,
        max: 4,
        guard: None,
        mode: ArrayMode::Unique(|a, b| a == b),
    };

    const ASCENDING_EVEN: ArrayRules<Tagged> = ArrayRules {
        context: "tagged",
        min: 0,
        max: 8,
        guard: Some(ElementGuard {
            read: only_even,
            write: only_even_item,
        }),
        mode: ArrayMode::Ascending(|t| t.0 as u32),
    };

    fn items(codes: &[u8]) -> Vec<Tagged> {
        codes.iter().copied().map(Tagged).collect()
    }

    #[test]
    fn count_bounds_are_inclusive() {
        assert!(UNIQUE.validate(&items(&[1])).is_ok());
        assert!(UNIQUE.validate(&items(&[1, 2, 3, 4])).is_ok());
        assert!(matches!(
            UNIQUE.validate(&[]),
            Err(Error::CountOutOfBounds { count: 0, min: 1, max: 4, .. })
        ));
        assert!(matches!(
            UNIQUE.validate(&items(&[1, 2, 3, 4, 5])),
            Err(Error::CountOutOfBounds { count: 5, .. })
        ));
    }

    #[test]
    fn unique_reports_first_duplicate_position() {
        match UNIQUE.validate(&items(&[7, 8, 7, 8])) {
            Err(Error::DuplicateReference { position: 2, .. }) => {}
            other => panic!("expected DuplicateReference, got {:?}", other),
        }
    }

    #[test]
    fn ascending_distinguishes_duplicate_from_disorder() {
        assert!(ASCENDING_EVEN.validate(&items(&[0, 2, 4])).is_ok());
        assert!(matches!(
            ASCENDING_EVEN.validate(&items(&[0, 2, 2])),
            Err(Error::DuplicateReference { position: 2, .. })
        ));
        assert!(matches!(
            ASCENDING_EVEN.validate(&items(&[4, 2])),
            Err(Error::OrderViolation { position: 1, .. })
        ));
    }

    #[test]
    fn guard_runs_on_write_and_read() {
        assert!(matches!(
            ASCENDING_EVEN.validate(&items(&[0, 3])),
            Err(Error::TypeMismatch { actual: 3, .. })
        ));

        // count = 2, elements 0 and 3
        let bytes = [2u8, 0, 0, 3];
        let mut r = Reader::new(&bytes);
        assert!(matches!(
            decode_array(&mut r, &ASCENDING_EVEN, ValidationMode::Perform),
            Err(Error::TypeMismatch { actual: 3, .. })
        ));

        let mut r = Reader::new(&bytes);
        let decoded = decode_array(&mut r, &ASCENDING_EVEN, ValidationMode::Skip).unwrap();
        assert_eq!(decoded, items(&[0, 3]));
    }

    #[test]
    fn decode_checks_count_before_elements() {
        // Claims 9 elements but carries none: the bound fires, not truncation.
        let bytes = [9u8, 0];
        let mut r = Reader::new(&bytes);
        assert!(matches!(
            decode_array(&mut r, &ASCENDING_EVEN, ValidationMode::Perform),
            Err(Error::CountOutOfBounds { count: 9, .. })
        ));

        let mut r = Reader::new(&bytes);
        assert!(matches!(
            decode_array(&mut r, &ASCENDING_EVEN, ValidationMode::Skip),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn encode_writes_u16_count_then_elements() {
        let mut w = Writer::new();
        encode_array(&mut w, &items(&[2, 4]), &ASCENDING_EVEN, ValidationMode::Perform).unwrap();
        assert_eq!(w.into_inner(), vec![2, 0, 2, 4]);

        let mut w = Writer::new();
        let unordered = items(&[4, 2]);
        let perform = encode_array(&mut w, &unordered, &ASCENDING_EVEN, ValidationMode::Perform);
        assert!(perform.is_err());
        assert!(encode_array(&mut w, &unordered, &ASCENDING_EVEN, ValidationMode::Skip).is_ok());
    }
}
