//! Trapping float-to-integer truncations
//!
//! Truncation is toward zero. The input must lie strictly inside the bounds
//! below or the conversion traps; NaN fails every comparison and therefore
//! traps through the same predicate. The bounds are the widest values of
//! the source float type whose truncation still fits the target integer,
//! which is why the f32 and f64 variants of the same target differ.

use super::super::TrapKind;

macro_rules! trunc {
    ($name:ident, $src:ty, $dst:ty, $lo:expr, $hi:expr) => {
        #[doc = concat!(
            stringify!($dst), ".trunc: traps unless ", stringify!($lo), " < value < ", stringify!($hi)
        )]
        pub fn $name(value: $src) -> Result<$dst, TrapKind> {
            if !(value > $lo && value < $hi) {
                return Err(TrapKind::InvalidConversion(f64::from(value)));
            }
            Ok(value as $dst)
        }
    };
}

trunc!(i32_trunc_f32_s, f32, i32, -2147483904.0f32, 2147483648.0f32);
trunc!(i32_trunc_f32_u, f32, u32, -1.0f32, 4294967296.0f32);
trunc!(i32_trunc_f64_s, f64, i32, -2147483649.0f64, 2147483648.0f64);
trunc!(i32_trunc_f64_u, f64, u32, -1.0f64, 4294967296.0f64);
trunc!(i64_trunc_f32_s, f32, i64, -9223373136366403584.0f32, 9223372036854775808.0f32);
trunc!(i64_trunc_f32_u, f32, u64, -1.0f32, 18446744073709551616.0f32);
trunc!(i64_trunc_f64_s, f64, i64, -9223372036854777856.0f64, 9223372036854775808.0f64);
trunc!(i64_trunc_f64_u, f64, u64, -1.0f64, 18446744073709551616.0f64);

#[cfg(test)]
mod tests {
    use super::*;

    fn traps<T>(result: Result<T, TrapKind>) -> bool {
        matches!(result, Err(TrapKind::InvalidConversion(_)))
    }

    #[test]
    fn test_i32_trunc_f32_s() {
        assert_eq!(i32_trunc_f32_s(0.0), Ok(0));
        assert_eq!(i32_trunc_f32_s(-0.0), Ok(0));
        assert_eq!(i32_trunc_f32_s(1.9), Ok(1));
        assert_eq!(i32_trunc_f32_s(-1.9), Ok(-1)); // toward zero
        assert_eq!(i32_trunc_f32_s(-2147483648.0), Ok(i32::MIN));

        assert!(traps(i32_trunc_f32_s(2147483648.0)));
        assert!(traps(i32_trunc_f32_s(-2147483904.0)));
        assert!(traps(i32_trunc_f32_s(f32::NAN)));
        assert!(traps(i32_trunc_f32_s(f32::INFINITY)));
        assert!(traps(i32_trunc_f32_s(f32::NEG_INFINITY)));
    }

    #[test]
    fn test_i32_trunc_f32_u() {
        assert_eq!(i32_trunc_f32_u(0.0), Ok(0));
        assert_eq!(i32_trunc_f32_u(-0.9), Ok(0)); // fractional negatives truncate to 0
        assert_eq!(i32_trunc_f32_u(4294967040.0), Ok(4294967040));

        assert!(traps(i32_trunc_f32_u(-1.0)));
        assert!(traps(i32_trunc_f32_u(4294967296.0)));
        assert!(traps(i32_trunc_f32_u(f32::NAN)));
    }

    #[test]
    fn test_i32_trunc_f64() {
        assert_eq!(i32_trunc_f64_s(2147483647.9), Ok(i32::MAX));
        assert_eq!(i32_trunc_f64_s(-2147483648.9), Ok(i32::MIN));
        assert!(traps(i32_trunc_f64_s(2147483648.0)));
        assert!(traps(i32_trunc_f64_s(-2147483649.0)));

        assert_eq!(i32_trunc_f64_u(4294967295.9), Ok(u32::MAX));
        assert!(traps(i32_trunc_f64_u(4294967296.0)));
        assert!(traps(i32_trunc_f64_u(-1.0)));
        assert!(traps(i32_trunc_f64_u(f64::NAN)));
    }

    #[test]
    fn test_i64_trunc_f32() {
        assert_eq!(i64_trunc_f32_s(-9223372036854775808.0), Ok(i64::MIN));
        assert!(traps(i64_trunc_f32_s(9223372036854775808.0)));
        assert!(traps(i64_trunc_f32_s(f32::NEG_INFINITY)));

        assert_eq!(i64_trunc_f32_u(18446742974197923840.0), Ok(18446742974197923840));
        assert!(traps(i64_trunc_f32_u(18446744073709551616.0)));
        assert!(traps(i64_trunc_f32_u(-1.0)));
    }

    #[test]
    fn test_i64_trunc_f64() {
        assert_eq!(i64_trunc_f64_s(-9223372036854775808.0), Ok(i64::MIN));
        assert_eq!(i64_trunc_f64_s(9223372036854774784.0), Ok(9223372036854774784));
        assert!(traps(i64_trunc_f64_s(9223372036854775808.0)));
        assert!(traps(i64_trunc_f64_s(-9223372036854777856.0)));

        assert_eq!(i64_trunc_f64_u(18446744073709549568.0), Ok(18446744073709549568));
        assert!(traps(i64_trunc_f64_u(18446744073709551616.0)));
        assert!(traps(i64_trunc_f64_u(f64::NAN)));
    }
}
