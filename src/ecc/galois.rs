/// GF(256) arithmetic for QR codes
/// Primitive polynomial x^8 + x^4 + x^3 + x^2 + 1 (0x11D), generator alpha = 2
use std::sync::OnceLock;

use crate::error::{QrError, Result};

const PRIMITIVE: u16 = 0x11D;

struct Tables {
    exp: [u8; 256],
    log: [u8; 256],
}

static TABLES: OnceLock<Tables> = OnceLock::new();

fn tables() -> &'static Tables {
    TABLES.get_or_init(|| {
        let mut exp = [0u8; 256];
        let mut log = [0u8; 256];
        let mut x: u16 = 1;
        for (i, slot) in exp.iter_mut().enumerate().take(255) {
            *slot = x as u8;
            log[x as usize] = i as u8;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= PRIMITIVE;
            }
        }
        // alpha^255 wraps back to 1
        exp[255] = exp[0];
        Tables { exp, log }
    })
}

/// GF(256) field operations using log/exp tables
pub struct Gf256;

impl Gf256 {
    /// alpha^power
    pub fn exp(power: usize) -> u8 {
        tables().exp[power % 255]
    }

    /// Discrete logarithm base alpha; zero has none
    pub fn log(value: u8) -> Result<u8> {
        if value == 0 {
            return Err(QrError::InvalidOperand);
        }
        Ok(tables().log[value as usize])
    }

    /// Field multiplication
    pub fn multiply(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let t = tables();
        let sum = t.log[a as usize] as usize + t.log[b as usize] as usize;
        t.exp[sum % 255]
    }

    /// Field division, failing on a zero divisor
    pub fn divide(a: u8, b: u8) -> Result<u8> {
        if b == 0 {
            return Err(QrError::DivisionByZero);
        }
        if a == 0 {
            return Ok(0);
        }
        let t = tables();
        let diff = t.log[a as usize] as usize + 255 - t.log[b as usize] as usize;
        Ok(t.exp[diff % 255])
    }

    /// base^exponent
    pub fn power(base: u8, exponent: usize) -> u8 {
        if exponent == 0 {
            return 1;
        }
        if base == 0 {
            return 0;
        }
        let t = tables();
        let log = t.log[base as usize] as usize;
        t.exp[(log * (exponent % 255)) % 255]
    }

    /// Multiplicative inverse, failing on zero
    pub fn inverse(a: u8) -> Result<u8> {
        if a == 0 {
            return Err(QrError::InvalidOperand);
        }
        let t = tables();
        Ok(t.exp[(255 - t.log[a as usize] as usize) % 255])
    }
}
