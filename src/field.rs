//! Arithmetic in the binary extension field GF(2^m).
//!
//! A [`Gf2mField`] owns the log/antilog tables generated from a primitive
//! modulus and is immutable once built, so a single instance can be shared
//! read-only by any number of polynomials and concurrent codec calls.
//!
//! Multiplication, inversion and squaring go through a [`FieldArithmetic`]
//! backend chosen when the field is constructed. [`LogTableArithmetic`] is the
//! portable reference implementation; an accelerated backend can be supplied
//! through [`Gf2mField::with_backend`] without touching any call site.
//!
//! # Examples
//!
//! ```rust
//! use galois_ecc::field::Gf2mField;
//!
//! let field = Gf2mField::new(4, 0x13).unwrap();
//! let a = 7;
//! assert_eq!(field.mul(a, field.inv(a)), 1);
//! ```

use crate::error::{Error, Result};
use std::fmt::{self, Debug, Display, Formatter};

/// Element of GF(2^m) in polynomial basis, `m <= 16`.
pub type Element = u16;

/// Smallest supported extension degree
pub const MIN_DEGREE: u32 = 2;

/// Largest supported extension degree
pub const MAX_DEGREE: u32 = 16;

/// Primitive moduli indexed by extension degree `m`; entries below
/// [`MIN_DEGREE`] are unused.
pub const DEFAULT_MODULI: [u32; 17] = [
    0, 0, 0x7, 0xB, 0x13, 0x25, 0x43, 0x89, 0x11D, 0x211, 0x409, 0x805, 0x1053, 0x201B, 0x4443,
    0x8003, 0x1100B,
];

/// Addition in GF(2^m) is XOR and needs no field context.
#[inline]
pub fn add(a: Element, b: Element) -> Element {
    a ^ b
}

/// Precomputed discrete log tables for one field.
///
/// `alog[i] = α^i` for `i` in `[0, order]` (`alog[order] == 1`), and
/// `log[alog[i]] = i`. `log[0]` is meaningless and never read.
#[derive(Clone, PartialEq, Eq)]
pub struct FieldTables {
    degree: u32,
    order: usize,
    alog: Vec<Element>,
    log: Vec<u32>,
}

impl FieldTables {
    /// Extension degree `m`
    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// Size of the multiplicative group, `2^m - 1`
    pub fn order(&self) -> usize {
        self.order
    }

    /// `α^i` for `i` in `[0, order]`
    #[inline]
    pub fn antilog(&self, i: usize) -> Element {
        self.alog[i]
    }

    /// Discrete log of a nonzero element
    #[inline]
    pub fn log(&self, a: Element) -> usize {
        self.log[a as usize] as usize
    }
}

impl Debug for FieldTables {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTables")
            .field("degree", &self.degree)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// Strategy for the multiplicative operations of a field.
///
/// Implementations must agree with the log/antilog tables they are handed:
/// the tables define which element is `α`.
pub trait FieldArithmetic: Send + Sync + Debug {
    /// Product of two elements
    fn mul(&self, tables: &FieldTables, a: Element, b: Element) -> Element;

    /// Multiplicative inverse; `0` maps to `0`
    fn inv(&self, tables: &FieldTables, a: Element) -> Element;

    /// Square of an element
    fn square(&self, tables: &FieldTables, a: Element) -> Element {
        self.mul(tables, a, a)
    }
}

/// Reference backend: one table lookup per operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTableArithmetic;

impl FieldArithmetic for LogTableArithmetic {
    #[inline]
    fn mul(&self, tables: &FieldTables, a: Element, b: Element) -> Element {
        if a == 0 || b == 0 {
            return 0;
        }
        let sum = tables.log(a) + tables.log(b);
        tables.antilog(sum % tables.order)
    }

    #[inline]
    fn inv(&self, tables: &FieldTables, a: Element) -> Element {
        if a == 0 {
            return 0;
        }
        tables.antilog(tables.order - tables.log(a))
    }
}

/// The field GF(2^m) with its tables and arithmetic backend.
pub struct Gf2mField {
    tables: FieldTables,
    /// `None` when the field was built from caller-supplied tables whose
    /// generator is not `x`
    modulus: Option<u32>,
    backend: Box<dyn FieldArithmetic>,
}

impl Gf2mField {
    /// Build GF(2^m) from a primitive modulus of degree `m`, using the
    /// reference backend.
    ///
    /// # Errors
    ///
    /// * `InvalidParameter` if `m` is outside `[2, 16]` or the modulus does not
    ///   have degree exactly `m`
    /// * `NotPrimitive` if `x` does not generate the multiplicative group
    pub fn new(degree: u32, modulus: u32) -> Result<Self> {
        Self::with_backend(degree, modulus, Box::new(LogTableArithmetic))
    }

    /// Build GF(2^m) from the entry of [`DEFAULT_MODULI`] for `m`.
    pub fn with_default_modulus(degree: u32) -> Result<Self> {
        check_degree(degree)?;
        Self::new(degree, DEFAULT_MODULI[degree as usize])
    }

    /// Build GF(2^m) from a modulus with an explicit arithmetic backend.
    pub fn with_backend(
        degree: u32,
        modulus: u32,
        backend: Box<dyn FieldArithmetic>,
    ) -> Result<Self> {
        check_degree(degree)?;
        if modulus >> degree != 1 {
            return Err(Error::InvalidParameter(format!(
                "modulus {:#x} does not have degree {}",
                modulus, degree
            )));
        }

        let tables = generate_tables(degree, modulus)?;
        log::debug!(
            "built GF(2^{}) from modulus {:#x} ({} nonzero elements)",
            degree,
            modulus,
            tables.order
        );

        Ok(Gf2mField {
            tables,
            modulus: Some(modulus),
            backend,
        })
    }

    /// Build GF(2^m) from caller-supplied antilog and log tables.
    ///
    /// `alog` must list `α^0, α^1, ..., α^(2^m - 2)` (an optional trailing
    /// entry equal to `1` is accepted) and `log` must invert it on every
    /// nonzero element.
    pub fn from_tables(degree: u32, alog: &[Element], log: &[Element]) -> Result<Self> {
        check_degree(degree)?;
        let size = 1usize << degree;
        let order = size - 1;

        if alog.len() < order || alog.len() > size || log.len() != size {
            return Err(Error::InvalidParameter(format!(
                "tables for GF(2^{}) need {} antilog and {} log entries, got {} and {}",
                degree,
                order,
                size,
                alog.len(),
                log.len()
            )));
        }
        if alog.len() == size && alog[order] != 1 {
            return Err(Error::invalid("antilog table must wrap around to 1"));
        }

        let mut seen = vec![false; size];
        for (i, &x) in alog[..order].iter().enumerate() {
            let slot = x as usize;
            if x == 0 || slot >= size || seen[slot] {
                return Err(Error::InvalidParameter(format!(
                    "antilog entry {} ({:#x}) repeats or leaves the field",
                    i, x
                )));
            }
            seen[slot] = true;
        }
        if alog[0] != 1 {
            return Err(Error::invalid("antilog table must start at 1"));
        }
        for x in 1..size {
            let l = log[x] as usize;
            if l >= order || alog[l] as usize != x {
                return Err(Error::InvalidParameter(format!(
                    "log table is inconsistent at element {:#x}",
                    x
                )));
            }
        }

        let mut full_alog = alog[..order].to_vec();
        full_alog.push(1);
        let tables = FieldTables {
            degree,
            order,
            alog: full_alog,
            log: log.iter().map(|&l| u32::from(l)).collect(),
        };

        // α = x in polynomial basis means α^m spells out the modulus tail
        let modulus = (alog[1] == 2)
            .then(|| (1u32 << degree) | u32::from(tables.antilog(degree as usize % order)));
        let field = Gf2mField {
            tables,
            modulus,
            backend: Box::new(LogTableArithmetic),
        };

        // Products must stay consistent with the polynomial basis the
        // tables claim; checking α·α^i = α^(i+1) via carry-less reduction
        // is only possible when the modulus is known.
        if let Some(modulus) = field.modulus {
            let reduced = Self::with_backend(degree, modulus, Box::new(LogTableArithmetic));
            match reduced {
                Ok(reference) if reference.tables.alog == field.tables.alog => {}
                _ => {
                    return Err(Error::invalid(
                        "antilog table does not match polynomial-basis multiplication",
                    ))
                }
            }
        }

        Ok(field)
    }

    /// Extension degree `m`
    pub fn degree(&self) -> u32 {
        self.tables.degree
    }

    /// Number of elements, `2^m`
    pub fn size(&self) -> usize {
        self.tables.order + 1
    }

    /// Order of the multiplicative group, `2^m - 1`
    pub fn order(&self) -> usize {
        self.tables.order
    }

    /// The modulus the field was generated from, when known
    pub fn modulus(&self) -> Option<u32> {
        self.modulus
    }

    /// The primitive element `α`
    pub fn primitive_element(&self) -> Element {
        self.tables.antilog(1 % self.tables.order)
    }

    /// Read-only access to the log/antilog tables
    pub fn tables(&self) -> &FieldTables {
        &self.tables
    }

    /// Whether `a` is an element of this field
    #[inline]
    pub fn contains(&self, a: Element) -> bool {
        (a as usize) < self.size()
    }

    /// Sum of two elements (XOR)
    #[inline]
    pub fn add(&self, a: Element, b: Element) -> Element {
        add(a, b)
    }

    /// Product of two elements
    #[inline]
    pub fn mul(&self, a: Element, b: Element) -> Element {
        self.backend.mul(&self.tables, a, b)
    }

    /// Multiplicative inverse. Returns `0` for `0`; callers guard against it.
    #[inline]
    pub fn inv(&self, a: Element) -> Element {
        self.backend.inv(&self.tables, a)
    }

    /// Square of an element
    #[inline]
    pub fn square(&self, a: Element) -> Element {
        self.backend.square(&self.tables, a)
    }

    /// Quotient `a / b`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `b` is zero.
    pub fn div(&self, a: Element, b: Element) -> Result<Element> {
        if b == 0 {
            return Err(Error::invalid("division by zero in GF(2^m)"));
        }
        Ok(self.mul(a, self.inv(b)))
    }

    /// `a^e` by square-and-multiply; `a^0 == 1` for every `a`, including zero.
    pub fn pow(&self, a: Element, mut e: u32) -> Element {
        let mut result = 1;
        let mut base = a;
        while e > 0 {
            if e & 1 == 1 {
                result = self.mul(result, base);
            }
            base = self.square(base);
            e >>= 1;
        }
        result
    }

    /// Square root, the inverse of the Frobenius map: `a^(2^(m-1))`
    pub fn sqrt(&self, a: Element) -> Element {
        (1..self.degree()).fold(a, |acc, _| self.square(acc))
    }

    /// `α^i`, reducing the exponent modulo the group order
    #[inline]
    pub fn alpha_pow(&self, i: usize) -> Element {
        self.tables.antilog(i % self.tables.order)
    }

    /// Discrete logarithm base `α`; `None` for zero
    pub fn log(&self, a: Element) -> Option<usize> {
        (a != 0 && self.contains(a)).then(|| self.tables.log(a))
    }
}

impl Debug for Gf2mField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gf2mField")
            .field("degree", &self.tables.degree)
            .field("modulus", &self.modulus)
            .field("backend", &self.backend)
            .finish()
    }
}

impl Display for Gf2mField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.modulus {
            Some(modulus) => write!(f, "GF(2^{}) mod {:#x}", self.degree(), modulus),
            None => write!(f, "GF(2^{})", self.degree()),
        }
    }
}

fn check_degree(degree: u32) -> Result<()> {
    if !(MIN_DEGREE..=MAX_DEGREE).contains(&degree) {
        return Err(Error::InvalidParameter(format!(
            "field degree must be between {} and {}, got {}",
            MIN_DEGREE, MAX_DEGREE, degree
        )));
    }
    Ok(())
}

/// Walk the powers of `x` modulo `modulus` and record them.
///
/// The walk must visit every nonzero element exactly once and land back on
/// `1` after `2^m - 1` steps.
fn generate_tables(degree: u32, modulus: u32) -> Result<FieldTables> {
    let size = 1usize << degree;
    let order = size - 1;
    let not_primitive = || Error::NotPrimitive { degree, modulus };

    let mut alog = vec![0 as Element; size];
    let mut log = vec![0u32; size];
    let mut seen = vec![false; size];

    let mut x: u32 = 1;
    for i in 0..order {
        let slot = x as usize;
        if x == 0 || seen[slot] {
            return Err(not_primitive());
        }
        seen[slot] = true;
        alog[i] = x as Element;
        log[slot] = i as u32;

        x <<= 1;
        if x & (1 << degree) != 0 {
            x ^= modulus;
        }
    }

    if x != 1 {
        return Err(not_primitive());
    }
    alog[order] = 1;

    Ok(FieldTables {
        degree,
        order,
        alog,
        log,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn gf16() -> Gf2mField {
        Gf2mField::new(4, 0x13).unwrap()
    }

    #[test]
    fn test_field_creation() {
        let field = gf16();
        assert_eq!(field.degree(), 4);
        assert_eq!(field.size(), 16);
        assert_eq!(field.order(), 15);
        assert_eq!(field.modulus(), Some(0x13));
        assert_eq!(field.primitive_element(), 2);

        for x in 1..16u16 {
            let l = field.log(x).unwrap();
            assert_eq!(field.alpha_pow(l), x);
        }
        assert_eq!(field.log(0), None);
    }

    #[test]
    fn test_invalid_degree() {
        assert!(matches!(Gf2mField::new(1, 0x3), Err(Error::InvalidParameter(_))));
        assert!(matches!(
            Gf2mField::new(17, 0x2002B),
            Err(Error::InvalidParameter(_))
        ));
        // degree of the modulus disagrees with m
        assert!(matches!(Gf2mField::new(4, 0x25), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_non_primitive_modulus() {
        // x^4 + x^3 + x^2 + x + 1 is irreducible but x has order 5
        assert_eq!(
            Gf2mField::new(4, 0x1F).unwrap_err(),
            Error::NotPrimitive {
                degree: 4,
                modulus: 0x1F
            }
        );
        // x^4 + 1 is reducible
        assert!(matches!(
            Gf2mField::new(4, 0x11),
            Err(Error::NotPrimitive { .. })
        ));
    }

    #[test]
    fn test_default_moduli_are_primitive() {
        for m in MIN_DEGREE..=MAX_DEGREE {
            let field = Gf2mField::with_default_modulus(m).unwrap();
            assert_eq!(field.order(), (1 << m) - 1);
        }
    }

    #[test]
    fn test_field_axioms() {
        let field = gf16();
        assert_eq!(field.mul(3, 5), field.mul(5, 3));

        for a in 0..16u16 {
            for b in 0..16u16 {
                assert_eq!(field.mul(a, b), field.mul(b, a));
                for c in [1u16, 7, 12] {
                    assert_eq!(
                        field.mul(field.mul(a, b), c),
                        field.mul(a, field.mul(b, c))
                    );
                    // distributivity over XOR
                    assert_eq!(
                        field.mul(a, add(b, c)),
                        add(field.mul(a, b), field.mul(a, c))
                    );
                }
            }
        }
    }

    #[test]
    fn test_inverse() {
        let field = gf16();
        for a in 1..16u16 {
            assert_eq!(field.mul(a, field.inv(a)), 1);
        }
        assert_eq!(field.inv(0), 0);
        assert!(field.div(3, 0).is_err());
        assert_eq!(field.div(field.mul(6, 9), 9).unwrap(), 6);
    }

    #[test]
    fn test_power_and_roots() {
        let field = gf16();
        for a in 0..16u16 {
            assert_eq!(field.pow(a, 0), 1);
            assert_eq!(field.pow(a, 1), a);
            assert_eq!(field.pow(a, 2), field.mul(a, a));
            assert_eq!(field.square(field.sqrt(a)), a);
        }
        for a in 1..16u16 {
            assert_eq!(field.pow(a, 15), 1);
        }
        assert_eq!(field.pow(0, 5), 0);
    }

    #[test]
    fn test_known_products() {
        // x^4 = x + 1 under 0x13
        let field = gf16();
        assert_eq!(field.mul(8, 2), 3);
        assert_eq!(field.alpha_pow(4), 3);
        assert_eq!(field.alpha_pow(15), 1);
    }

    #[test]
    fn test_from_tables() {
        let reference = Gf2mField::new(5, 0x25).unwrap();
        let alog: Vec<u16> = (0..32).map(|i| reference.alpha_pow(i)).collect();
        let mut log = vec![0u16; 32];
        for x in 1..32u16 {
            log[x as usize] = reference.log(x).unwrap() as u16;
        }

        let field = Gf2mField::from_tables(5, &alog, &log).unwrap();
        assert_eq!(field.modulus(), Some(0x25));
        for a in 0..32u16 {
            for b in 0..32u16 {
                assert_eq!(field.mul(a, b), reference.mul(a, b));
            }
        }

        let mut broken = log.clone();
        broken[3] = broken[5];
        assert!(Gf2mField::from_tables(5, &alog, &broken).is_err());
        assert!(Gf2mField::from_tables(5, &alog[..10], &log).is_err());
    }

    #[derive(Debug, Default)]
    struct CountingArithmetic {
        calls: Arc<AtomicUsize>,
    }

    impl FieldArithmetic for CountingArithmetic {
        fn mul(&self, tables: &FieldTables, a: Element, b: Element) -> Element {
            self.calls.fetch_add(1, Ordering::Relaxed);
            LogTableArithmetic.mul(tables, a, b)
        }

        fn inv(&self, tables: &FieldTables, a: Element) -> Element {
            self.calls.fetch_add(1, Ordering::Relaxed);
            LogTableArithmetic.inv(tables, a)
        }
    }

    #[test]
    fn test_custom_backend() {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = CountingArithmetic {
            calls: Arc::clone(&calls),
        };
        let field = Gf2mField::with_backend(4, 0x13, Box::new(backend)).unwrap();
        let reference = gf16();

        assert_eq!(field.mul(9, 11), reference.mul(9, 11));
        assert_eq!(field.inv(9), reference.inv(9));
        assert_eq!(field.square(9), reference.square(9));
        assert_eq!(calls.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_shared_across_threads() {
        let field = Arc::new(Gf2mField::new(8, 0x11D).unwrap());
        let handles: Vec<_> = (0..4u16)
            .map(|k| {
                let field = Arc::clone(&field);
                std::thread::spawn(move || {
                    (1..256u16).all(|a| field.mul(a ^ k, field.inv(a ^ k)) == 1 || a ^ k == 0)
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
