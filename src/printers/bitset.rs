use super::{index_label, Child, Children, Printer, Summary};
use crate::errors::Result;
use crate::memory::value::Value;
use crate::snapshot::Target;

/// `std::bitset<N>`: one child per set bit, labelled with the bit position
#[derive(Debug, Clone)]
pub struct BitsetPrinter {
    value: Value,
}

impl BitsetPrinter {
    pub fn new(value: Value) -> Self {
        BitsetPrinter { value }
    }

    /// Storage words, lowest bits first
    fn words(&self, target: &dyn Target) -> Result<Vec<Value>> {
        let words = self.value.field(target, "_M_w")?;
        match words.array_len(target)? {
            Some(len) => (0..len).map(|i| words.index(target, i)).collect(),
            None => Ok(vec![words]),
        }
    }
}

impl Printer for BitsetPrinter {
    fn summary(&self, _target: &dyn Target) -> Result<Summary> {
        Ok(Summary::text("std::bitset"))
    }

    fn children<'a>(&'a self, target: &'a dyn Target) -> Result<Option<Children<'a>>> {
        let mut set_bits: Vec<Result<Child>> = Vec::new();
        for (index, word) in self.words(target)?.iter().enumerate() {
            let bits_per_word = target.types().sizeof(word.ty())? * 8;
            let mut w = word.read_uint(target)?;
            let mut bit = 0;
            while w != 0 {
                if w & 1 != 0 {
                    set_bits.push(Ok(Child::int(index_label(index * bits_per_word + bit), 1)));
                }
                bit += 1;
                w >>= 1;
            }
        }
        Ok(Some(Box::new(set_bits.into_iter())))
    }
}
