/// Reed-Solomon error correction for QR codes
/// Codewords are polynomials over GF(256) with the first byte as the highest
/// degree coefficient; the generator has roots alpha^0 .. alpha^(ecc-1).
use super::galois::Gf256;
use crate::error::{QrError, Result};

/// Systematic Reed-Solomon encoder for a fixed number of ECC codewords
#[derive(Debug, Clone)]
pub struct ReedSolomonEncoder {
    /// Generator coefficients, highest degree first, leading 1 included
    generator: Vec<u8>,
}

impl ReedSolomonEncoder {
    /// Build the generator polynomial prod(x - alpha^i) for i in 0..ecc_count
    pub fn new(ecc_count: usize) -> Result<Self> {
        if ecc_count == 0 {
            return Err(QrError::invalid_input("ecc codeword count must be positive"));
        }
        let mut generator = vec![1u8];
        for i in 0..ecc_count {
            let root = Gf256::exp(i);
            let mut next = vec![0u8; generator.len() + 1];
            for (j, &coef) in generator.iter().enumerate() {
                next[j] ^= coef;
                next[j + 1] ^= Gf256::multiply(coef, root);
            }
            generator = next;
        }
        Ok(Self { generator })
    }

    /// Number of ECC codewords produced per call
    pub fn ecc_count(&self) -> usize {
        self.generator.len() - 1
    }

    /// Generator coefficients, highest degree first
    pub fn generator(&self) -> &[u8] {
        &self.generator
    }

    /// Remainder of data * x^ecc divided by the generator
    pub fn ecc(&self, data: &[u8]) -> Vec<u8> {
        let ecc_count = self.ecc_count();
        let mut remainder = vec![0u8; ecc_count];
        for &byte in data {
            let factor = byte ^ remainder[0];
            remainder.rotate_left(1);
            remainder[ecc_count - 1] = 0;
            for (r, &g) in remainder.iter_mut().zip(&self.generator[1..]) {
                *r ^= Gf256::multiply(g, factor);
            }
        }
        remainder
    }

    /// `data` followed by its ECC codewords
    pub fn encode(&self, data: &[u8]) -> Vec<u8> {
        let mut codeword = Vec::with_capacity(data.len() + self.ecc_count());
        codeword.extend_from_slice(data);
        codeword.extend(self.ecc(data));
        codeword
    }
}

/// Append `ecc_count` ECC codewords to `data`
pub fn encode(data: &[u8], ecc_count: usize) -> Result<Vec<u8>> {
    Ok(ReedSolomonEncoder::new(ecc_count)?.encode(data))
}

/// Reed-Solomon decoder for QR codes
pub struct ReedSolomonDecoder {
    num_ecc_codewords: usize,
}

impl ReedSolomonDecoder {
    /// Decoder for blocks carrying `num_ecc_codewords` ECC bytes
    pub fn new(num_ecc_codewords: usize) -> Self {
        Self { num_ecc_codewords }
    }

    /// Correct `received` in place; returns the number of corrected bytes
    pub fn decode(&self, received: &mut [u8]) -> Result<usize> {
        if received.len() <= self.num_ecc_codewords || received.len() > 255 {
            return Err(QrError::decode("block length out of range"));
        }

        let syndrome = self.calculate_syndrome(received);
        if syndrome.iter().all(|&s| s == 0) {
            return Ok(0);
        }

        // Find error locator polynomial using Berlekamp-Massey
        let sigma = self.find_error_locator(&syndrome)?;
        let degree = sigma.len() - 1;
        if degree == 0 || 2 * degree > self.num_ecc_codewords {
            return Err(QrError::decode("too many codeword errors"));
        }

        // Find error positions (Chien search)
        let positions = self.find_error_positions(&sigma, received.len())?;

        // Find error values (Forney algorithm)
        let values = self.find_error_values(&sigma, &syndrome, &positions, received.len())?;

        for (&pos, &value) in positions.iter().zip(&values) {
            received[pos] ^= value;
        }

        // Verify syndrome is now zero
        if self.calculate_syndrome(received).iter().any(|&s| s != 0) {
            return Err(QrError::decode("uncorrectable block"));
        }

        Ok(positions.len())
    }

    fn calculate_syndrome(&self, received: &[u8]) -> Vec<u8> {
        (0..self.num_ecc_codewords)
            .map(|i| {
                // Horner evaluation at alpha^i, highest degree first
                let x = Gf256::exp(i);
                received
                    .iter()
                    .fold(0u8, |acc, &c| Gf256::multiply(acc, x) ^ c)
            })
            .collect()
    }

    fn find_error_locator(&self, syndrome: &[u8]) -> Result<Vec<u8>> {
        // Ascending coefficients, sigma[0] = 1
        let mut sigma = vec![1u8];
        let mut prev = vec![1u8];
        let mut prev_delta = 1u8;
        let mut l = 0usize;
        let mut m = 1usize;

        for n in 0..syndrome.len() {
            let mut delta = syndrome[n];
            for i in 1..=l.min(sigma.len() - 1) {
                delta ^= Gf256::multiply(sigma[i], syndrome[n - i]);
            }

            if delta == 0 {
                m += 1;
                continue;
            }

            let coef = Gf256::divide(delta, prev_delta)?;
            let snapshot = sigma.clone();
            if sigma.len() < prev.len() + m {
                sigma.resize(prev.len() + m, 0);
            }
            // sigma = sigma - coef * x^m * prev
            for (j, &p) in prev.iter().enumerate() {
                sigma[j + m] ^= Gf256::multiply(coef, p);
            }

            if 2 * l <= n {
                l = n + 1 - l;
                prev = snapshot;
                prev_delta = delta;
                m = 1;
            } else {
                m += 1;
            }
        }

        while sigma.len() > 1 && sigma.last() == Some(&0) {
            sigma.pop();
        }
        if sigma.len() - 1 != l {
            return Err(QrError::decode("error locator degree mismatch"));
        }
        Ok(sigma)
    }

    fn find_error_positions(&self, sigma: &[u8], n: usize) -> Result<Vec<usize>> {
        // Position pos has locator X = alpha^(n-1-pos); sigma vanishes at X^-1
        let mut positions = Vec::new();
        for pos in 0..n {
            let x_inv = Gf256::exp(255 - (n - 1 - pos) % 255);
            if evaluate(sigma, x_inv) == 0 {
                positions.push(pos);
            }
        }

        if positions.len() != sigma.len() - 1 {
            return Err(QrError::decode("wrong number of error positions"));
        }
        Ok(positions)
    }

    fn find_error_values(
        &self,
        sigma: &[u8],
        syndrome: &[u8],
        positions: &[usize],
        n: usize,
    ) -> Result<Vec<u8>> {
        // omega = syndrome * sigma mod x^(2t)
        let mut omega = vec![0u8; syndrome.len()];
        for (i, slot) in omega.iter_mut().enumerate() {
            for j in 0..=i.min(sigma.len() - 1) {
                *slot ^= Gf256::multiply(sigma[j], syndrome[i - j]);
            }
        }

        // sigma'(x) keeps the odd-degree terms shifted down by one
        let derivative: Vec<u8> = sigma
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &c)| if i % 2 == 1 { c } else { 0 })
            .collect();

        positions
            .iter()
            .map(|&pos| {
                let exp = (n - 1 - pos) % 255;
                let x_k = Gf256::exp(exp);
                let x_inv = Gf256::exp(255 - exp);
                let omega_val = evaluate(&omega, x_inv);
                let denom = evaluate(&derivative, x_inv);
                if denom == 0 {
                    return Err(QrError::decode("error locator derivative is zero"));
                }
                // Forney: e_k = X_k * omega(X_k^-1) / sigma'(X_k^-1)
                Ok(Gf256::multiply(x_k, Gf256::divide(omega_val, denom)?))
            })
            .collect()
    }
}

/// Evaluate an ascending-coefficient polynomial at `x`
fn evaluate(poly: &[u8], x: u8) -> u8 {
    poly.iter()
        .rev()
        .fold(0u8, |acc, &c| Gf256::multiply(acc, x) ^ c)
}
