//! Binary Goppa codes with Patterson decoding.
//!
//! A Goppa code is fixed by a support `L = (L_0, ..., L_{n-1})` of distinct
//! field elements and a Goppa polynomial `g` of degree `t` with no roots in
//! `L`. A word `c` is a codeword iff
//!
//! ```text
//! Σ c_i / (x - L_i) ≡ 0 (mod g(x))
//! ```
//!
//! With `g` irreducible the code corrects `t` errors, which is what the
//! Patterson decoder relies on:
//!
//! 1. `S(x) = Σ_{r_i = 1} (x - L_i)^-1 mod g`; zero means no errors
//! 2. `T = S^-1 mod g`
//! 3. `τ = sqrt(T + x) mod g`
//! 4. Run the Euclidean algorithm on `(g, τ)` until the remainder `a` has
//!    degree at most `t/2`; the matching Bézout coefficient is `b`
//! 5. `σ(x) = a(x)^2 + x·b(x)^2`; its roots among the support are the errors
//!
//! Codewords are laid out `message (k bits) || parity (r bits)`, where `r` is
//! the rank of the parity-check matrix. Encoding needs the last `r` columns
//! to be independent; [`GoppaCode::with_full_support`] orders the support so
//! that they are.

use crate::bits::{BitBuffer, Bits};
use crate::ecc::{Codec, Decoded};
use crate::error::{Error, Result};
use crate::field::{Element, Gf2mField};
use crate::linalg::BitMatrix;
use crate::poly::FieldPoly;
use rand::Rng;
use std::fmt::{Display, Formatter};

/// Attempts before [`random_goppa_polynomial`] gives up
const MAX_ATTEMPTS: usize = 1 << 16;

/// Binary Goppa code over a borrowed field
#[derive(Debug)]
pub struct GoppaCode<'f> {
    field: &'f Gf2mField,
    support: Vec<Element>,
    goppa: FieldPoly<'f>,
    /// `m·t × n` parity-check matrix over GF(2)
    parity_check: BitMatrix,
    /// `r × k` map from message bits to parity bits, when the last `r`
    /// columns of the parity-check matrix are independent
    encoder: Option<BitMatrix>,
    /// Message bits per codeword
    k: usize,
    /// `(x - L_i)^-1 mod g` for each support element
    syndrome_terms: Vec<FieldPoly<'f>>,
    /// `sqrt(x) mod g`
    sqrt_x: FieldPoly<'f>,
}

impl<'f> GoppaCode<'f> {
    /// Build a Goppa code from a support and an irreducible Goppa polynomial
    ///
    /// # Arguments
    ///
    /// * `field` - the field the support and polynomial live in
    /// * `support` - distinct field elements, one per codeword bit
    /// * `goppa` - Goppa polynomial of degree `t >= 1`
    ///
    /// # Errors
    ///
    /// * `InvalidSupport` if a support element is a root of `goppa`
    /// * `InvalidParameter` if the support has repeated or out-of-field
    ///   elements, `n <= m·t`, or `goppa` is not irreducible
    pub fn new(field: &'f Gf2mField, support: Vec<Element>, goppa: FieldPoly<'f>) -> Result<Self> {
        let t = check_goppa_polynomial(field, &goppa)?;

        let mut seen = vec![false; field.size()];
        for (index, &element) in support.iter().enumerate() {
            if !field.contains(element) {
                return Err(Error::InvalidParameter(format!(
                    "support element {} ({:#x}) is outside GF(2^{})",
                    index,
                    element,
                    field.degree()
                )));
            }
            if std::mem::replace(&mut seen[element as usize], true) {
                return Err(Error::InvalidParameter(format!(
                    "support element {:#x} appears more than once",
                    element
                )));
            }
            if goppa.eval(element) == 0 {
                return Err(Error::InvalidSupport { index, element });
            }
        }

        let n = support.len();
        let mt = field.degree() as usize * t;
        if n <= mt {
            return Err(Error::InvalidParameter(format!(
                "support of {} elements leaves no message bits with m·t = {}",
                n, mt
            )));
        }
        if !goppa.is_irreducible() {
            return Err(Error::invalid(
                "Goppa polynomial must be irreducible for Patterson decoding",
            ));
        }

        let parity_check = parity_check_matrix(field, &support, &goppa);
        let (encoder, rank) = systematic_encoder(&parity_check);
        let k = n - rank;

        let syndrome_terms = support
            .iter()
            .map(|&l| FieldPoly::linear(field, l).inv_mod(&goppa))
            .collect::<Result<Vec<_>>>()?;

        // The quotient ring is GF(2^(m·t)), so sqrt(y) = y^(2^(m·t - 1))
        let mut sqrt_x = FieldPoly::monomial(field, 1, 1).rem(&goppa)?;
        for _ in 1..mt {
            sqrt_x = sqrt_x.square_mod(&goppa)?;
        }

        log::debug!(
            "built Goppa({},{},{}) over GF(2^{}), parity-check rank {}, systematic: {}",
            n,
            k,
            t,
            field.degree(),
            rank,
            encoder.is_some()
        );

        Ok(GoppaCode {
            field,
            support,
            goppa,
            parity_check,
            encoder,
            k,
            syndrome_terms,
            sqrt_x,
        })
    }

    /// Build a code whose support is every field element that is not a root
    /// of `goppa`, ordered so the code always has a systematic encoder.
    pub fn with_full_support(field: &'f Gf2mField, goppa: FieldPoly<'f>) -> Result<Self> {
        check_goppa_polynomial(field, &goppa)?;
        let candidates: Vec<Element> = (0..field.size())
            .map(|e| e as Element)
            .filter(|&e| goppa.eval(e) != 0)
            .collect();

        // Pivot columns of the natural-order matrix go last
        let pivots = parity_check_matrix(field, &candidates, &goppa).row_reduce();
        let mut is_pivot = vec![false; candidates.len()];
        for &p in &pivots {
            is_pivot[p] = true;
        }
        let support = (0..candidates.len())
            .filter(|&i| !is_pivot[i])
            .chain(pivots.iter().copied())
            .map(|i| candidates[i])
            .collect();

        Self::new(field, support, goppa)
    }

    /// Codeword length `n`, the size of the support
    pub fn n(&self) -> usize {
        self.support.len()
    }

    /// Message length `k`
    pub fn k(&self) -> usize {
        self.k
    }

    /// Correction capability `t`, the degree of the Goppa polynomial
    pub fn t(&self) -> usize {
        self.goppa.degree().unwrap_or(0)
    }

    /// The support, one element per codeword position
    pub fn support(&self) -> &[Element] {
        &self.support
    }

    /// The Goppa polynomial
    pub fn goppa_polynomial(&self) -> &FieldPoly<'f> {
        &self.goppa
    }

    /// The field the code is defined over
    pub fn field(&self) -> &'f Gf2mField {
        self.field
    }

    /// The binary `m·t × n` parity-check matrix
    pub fn parity_check(&self) -> &BitMatrix {
        &self.parity_check
    }

    /// Whether the support order admits a systematic encoder
    pub fn is_systematic(&self) -> bool {
        self.encoder.is_some()
    }

    /// Systematically encode up to `k` message bits; shorter messages are
    /// zero-padded.
    ///
    /// # Errors
    ///
    /// * `InputTooLarge` if `message` has more than `k` bits
    /// * `NotSupported` if the last `r` parity-check columns are dependent
    pub fn encode(&self, message: &Bits) -> Result<BitBuffer> {
        if message.len() > self.k {
            return Err(Error::InputTooLarge {
                length: message.len(),
                max_length: self.k,
            });
        }
        let encoder = self.encoder.as_ref().ok_or_else(|| {
            Error::NotSupported(
                "support order has no systematic parity block; \
                 use GoppaCode::with_full_support or reorder the support"
                    .to_string(),
            )
        })?;

        let mut codeword = BitBuffer::with_capacity(self.n());
        codeword.extend_from_bitslice(message);
        codeword.resize(self.k, false);
        let parity = encoder.mul_vec(&codeword)?;
        codeword.extend(parity.iter().by_vals());
        Ok(codeword)
    }

    /// Correct up to `t` bit errors in the first `n` bits of `received`.
    ///
    /// # Errors
    ///
    /// * `InputTooShort` if `received` has fewer than `n` bits
    /// * `Uncorrectable` if the error locator does not split into at most
    ///   `t` distinct roots over the support
    pub fn decode(&self, received: &Bits) -> Result<Decoded> {
        let n = self.n();
        if received.len() < n {
            return Err(Error::InputTooShort {
                length: received.len(),
                min_length: n,
            });
        }

        let syndrome = received[..n]
            .iter_ones()
            .fold(FieldPoly::zero(self.field), |acc, i| {
                &acc + &self.syndrome_terms[i]
            });
        if syndrome.is_zero() {
            return Ok(Decoded {
                bits: received.to_bitvec(),
                corrections: 0,
                message_len: self.k,
            });
        }
        log::trace!("syndrome {}", syndrome);

        let locator = self.error_locator(&syndrome)?;
        let positions: Vec<usize> = (0..n)
            .filter(|&i| locator.eval(self.support[i]) == 0)
            .collect();
        log::trace!("locator {} has roots at {:?}", locator, positions);

        let t = self.t();
        if Some(positions.len()) != locator.degree() || positions.len() > t {
            return Err(Error::Uncorrectable(format!(
                "located {} roots for an error locator of degree {:?} (t = {})",
                positions.len(),
                locator.degree(),
                t
            )));
        }

        let mut bits = received.to_bitvec();
        for &i in &positions {
            let flipped = !bits[i];
            bits.set(i, flipped);
        }

        Ok(Decoded {
            bits,
            corrections: positions.len(),
            message_len: self.k,
        })
    }

    /// Patterson steps 2 to 5: from a nonzero syndrome to `σ(x)`.
    fn error_locator(&self, syndrome: &FieldPoly<'f>) -> Result<FieldPoly<'f>> {
        let x = FieldPoly::monomial(self.field, 1, 1);
        let inverse = syndrome
            .inv_mod(&self.goppa)
            .map_err(|_| Error::Uncorrectable("syndrome is not invertible".to_string()))?;
        let tau = (&inverse + &x).sqrt_mod(&self.sqrt_x, &self.goppa)?;

        // Key equation a ≡ b·τ (mod g) with deg a <= t/2, deg b <= (t-1)/2
        let bound = self.t() / 2;
        let mut r_prev = self.goppa.clone();
        let mut r = tau;
        let mut u_prev = FieldPoly::zero(self.field);
        let mut u = FieldPoly::one(self.field);
        while r.degree().map_or(false, |d| d > bound) {
            let (q, rem) = r_prev.div_rem(&r)?;
            let next = &u_prev + &(&q * &u);
            r_prev = std::mem::replace(&mut r, rem);
            u_prev = std::mem::replace(&mut u, next);
        }

        Ok(&(&r * &r) + &(&u * &u).shift(1))
    }
}

/// Validate `goppa` against `field` and return its degree `t`
fn check_goppa_polynomial(field: &Gf2mField, goppa: &FieldPoly<'_>) -> Result<usize> {
    if !std::ptr::eq(field, goppa.field()) {
        return Err(Error::invalid(
            "Goppa polynomial belongs to a different field",
        ));
    }
    if goppa.coefficients().iter().any(|&c| !field.contains(c)) {
        return Err(Error::invalid("Goppa polynomial has coefficients outside the field"));
    }
    match goppa.degree() {
        Some(t) if t >= 1 => Ok(t),
        _ => Err(Error::invalid("Goppa polynomial must have degree at least 1")),
    }
}

/// Row `j·m + b`, column `i` holds bit `b` of `L_i^j / g(L_i)`
fn parity_check_matrix(field: &Gf2mField, support: &[Element], goppa: &FieldPoly<'_>) -> BitMatrix {
    let m = field.degree() as usize;
    let t = goppa.degree().unwrap_or(0);
    let mut matrix = BitMatrix::new(m * t, support.len());

    for (i, &l) in support.iter().enumerate() {
        let mut value = field.inv(goppa.eval(l));
        for j in 0..t {
            for bit in 0..m {
                if (value >> bit) & 1 == 1 {
                    matrix.set(j * m + bit, i, true);
                }
            }
            value = field.mul(value, l);
        }
    }
    matrix
}

/// Row-reduce `[H_parity | H_message]`, taking the parity block to be the
/// last `rank` columns. Returns the `rank × k` parity map if that block is
/// invertible, and the rank.
fn systematic_encoder(parity_check: &BitMatrix) -> (Option<BitMatrix>, usize) {
    let rank = parity_check.rank();
    let n = parity_check.cols();
    let k = n - rank;

    let order: Vec<usize> = (k..n).chain(0..k).collect();
    let mut reduced = parity_check.select_columns(&order);
    let pivots = reduced.row_reduce();
    if pivots.iter().enumerate().any(|(row, &col)| row != col) {
        return (None, rank);
    }

    let rows = (0..rank).map(|row| reduced.row(row)[rank..].to_bitvec()).collect();
    (BitMatrix::from_rows(rows).ok(), rank)
}

/// Draw monic polynomials of degree `t` until one is irreducible.
///
/// # Errors
///
/// * `InvalidParameter` if `t` is zero
/// * `NotSupported` if no irreducible polynomial turns up within the attempt
///   limit
pub fn random_goppa_polynomial<'f, R: Rng>(
    field: &'f Gf2mField,
    t: usize,
    rng: &mut R,
) -> Result<FieldPoly<'f>> {
    if t == 0 {
        return Err(Error::invalid("Goppa polynomial degree must be positive"));
    }

    let size = field.size() as u32;
    for attempt in 1..=MAX_ATTEMPTS {
        let mut coeffs: Vec<Element> = (0..t).map(|_| rng.gen_range(0..size) as Element).collect();
        coeffs.push(1);
        let candidate = FieldPoly::from_coefficients(field, coeffs);
        if candidate.is_irreducible() {
            log::debug!("found irreducible Goppa polynomial after {} attempts", attempt);
            return Ok(candidate);
        }
    }

    Err(Error::NotSupported(format!(
        "no irreducible polynomial of degree {} found in {} attempts",
        t, MAX_ATTEMPTS
    )))
}

impl Codec for GoppaCode<'_> {
    fn name(&self) -> &'static str {
        "goppa"
    }

    fn message_len(&self) -> usize {
        self.k
    }

    fn codeword_len(&self) -> usize {
        self.n()
    }

    fn encode(&self, message: &Bits) -> Result<BitBuffer> {
        GoppaCode::encode(self, message)
    }

    fn decode(&self, received: &Bits) -> Result<Decoded> {
        GoppaCode::decode(self, received)
    }
}

impl Display for GoppaCode<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Goppa({},{},{}) over GF(2^{})",
            self.n(),
            self.k,
            self.t(),
            self.field.degree()
        )
    }
}
