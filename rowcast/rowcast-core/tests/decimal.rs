use rowcast_core::{Decimal, MAX_RESCALE_DIGITS, ParseDecimalError};

#[test]
fn parses_plain_and_exponent_forms() -> Result<(), ParseDecimalError> {
    let d = "12.50".parse::<Decimal>()?;
    assert_eq!(d, Decimal::new(1250, 2));
    assert_eq!(d.scale(), 2);
    assert_eq!("-0.005".parse::<Decimal>()?, Decimal::new(-5, 3));
    assert_eq!("+7".parse::<Decimal>()?, Decimal::new(7, 0));
    assert_eq!(".5".parse::<Decimal>()?, Decimal::new(5, 1));
    assert_eq!("1.5e3".parse::<Decimal>()?, Decimal::new(15, -2));
    assert_eq!("25E-4".parse::<Decimal>()?, Decimal::new(25, 4));
    Ok(())
}

#[test]
fn rejects_malformed_literals() {
    for text in ["", "-", ".", "1.2.3", "abc", "1e", "1e+x", "12a", "1_000"] {
        assert!(text.parse::<Decimal>().is_err(), "{text:?} should not parse");
    }
}

#[test]
fn precision_is_not_capped() -> Result<(), ParseDecimalError> {
    let d = "1234567890123456789012345678901234567890.5".parse::<Decimal>()?;
    assert_eq!(d.precision(), 41);
    assert_eq!(d.scale(), 1);
    assert_eq!(d.to_string(), "1234567890123456789012345678901234567890.5");

    let wide = "9".repeat(120).parse::<Decimal>()?;
    assert_eq!(wide.precision(), 120);
    assert_eq!(wide.rescale(2).map(|v| v.precision()), Some(122));
    Ok(())
}

#[test]
fn exponent_must_fit_a_32_bit_scale() -> Result<(), ParseDecimalError> {
    let huge = "1e2147483647".parse::<Decimal>()?;
    assert_eq!(huge.scale(), -2147483647);
    assert!("1e2147483649".parse::<Decimal>().is_err());
    assert!("1e-2147483649".parse::<Decimal>().is_err());
    assert!("1e99999999999999999999".parse::<Decimal>().is_err());
    Ok(())
}

#[test]
fn display_of_extreme_exponents_stays_compact() -> Result<(), ParseDecimalError> {
    let rendered = "1e2147483647".parse::<Decimal>()?.to_string();
    assert!(rendered.len() < 32, "{rendered}");
    let rendered = "1e-2147483647".parse::<Decimal>()?.to_string();
    assert!(rendered.len() < 32, "{rendered}");
    Ok(())
}

#[test]
fn displays_in_plain_notation() {
    assert_eq!(Decimal::new(1250, 2).to_string(), "12.50");
    assert_eq!(Decimal::new(-5, 3).to_string(), "-0.005");
    assert_eq!(Decimal::new(7, 0).to_string(), "7");
}

#[test]
fn rescale_rounds_half_away_from_zero() {
    assert_eq!(Decimal::new(125, 2).rescale(1), Some(Decimal::new(13, 1)));
    assert_eq!(Decimal::new(-125, 2).rescale(1), Some(Decimal::new(-13, 1)));
    assert_eq!(Decimal::new(124, 2).rescale(1), Some(Decimal::new(12, 1)));
    assert_eq!(Decimal::new(95, 1).rescale(0), Some(Decimal::new(10, 0)));
    let up = Decimal::new(12, 1).rescale(3);
    assert_eq!(up.as_ref().map(Decimal::scale), Some(3));
    assert_eq!(up.map(|v| v.unscaled()), Some(1200.into()));
    assert_eq!(Decimal::new(i128::MAX, 0).rescale(1).map(|v| v.precision()), Some(40));
}

#[test]
fn rescale_at_scale_limits_does_not_overflow() {
    // Growing by two billion digits is refused rather than attempted.
    assert_eq!(Decimal::new(1, -2147483647).rescale(2), None);
    assert_eq!(Decimal::new(1, 0).rescale(MAX_RESCALE_DIGITS as i64), None);
    assert!(Decimal::new(1, 0).rescale(MAX_RESCALE_DIGITS as i64 - 1).is_some());
    // Scale differences beyond i64 are refused.
    assert_eq!(Decimal::new(1, i64::MAX).rescale(i64::MIN), None);
    assert_eq!(Decimal::new(1, i64::MIN).rescale(i64::MAX), None);
    // Dropping more digits than the value has leaves zero.
    assert_eq!(Decimal::new(7, 2147483647).rescale(0), Some(Decimal::zero()));
    assert_eq!(Decimal::new(-6, 1).rescale(0), Some(Decimal::new(-1, 0)));
}

#[test]
fn truncation_drops_the_fraction() -> Result<(), ParseDecimalError> {
    assert_eq!(Decimal::new(39, 1).trunc_wrapping(), 3);
    assert_eq!(Decimal::new(-39, 1).trunc_wrapping(), -3);
    assert_eq!(Decimal::new(7, -2).trunc_wrapping(), 700);
    assert_eq!(Decimal::new(1, 60).trunc_wrapping(), 0);
    assert_eq!(Decimal::new(1, 2147483647).trunc_wrapping(), 0);
    // Low-order 128 bits: 2^128 + 1 keeps 1, and 10^200 is a multiple of 2^128.
    let past = "340282366920938463463374607431768211457".parse::<Decimal>()?;
    assert_eq!(past.trunc_wrapping(), 1);
    assert_eq!(Decimal::new(1, -200).trunc_wrapping(), 0);
    assert_eq!("1e2147483647".parse::<Decimal>()?.trunc_wrapping(), 0);
    Ok(())
}

#[test]
fn float_round_trip_is_shortest() {
    assert_eq!(Decimal::from_f64(0.1), Some(Decimal::new(1, 1)));
    assert_eq!(Decimal::from_f64(-2.5), Some(Decimal::new(-25, 1)));
    assert_eq!(Decimal::from_f32(0.3), Some(Decimal::new(3, 1)));
    assert_eq!(Decimal::from_f64(f64::NAN), None);
    assert_eq!(Decimal::new(1, 1).to_f64(), 0.1);
    assert_eq!(Decimal::new(3, 1).to_f32(), 0.3_f32);
    assert_eq!(Decimal::new(1, -2147483647).to_f64(), f64::INFINITY);
}

#[test]
fn equality_compares_magnitude() {
    let d = Decimal::new(1500, 2);
    assert_eq!(d, Decimal::new(15, 0));
    assert_eq!(d.precision(), 4);
    assert_eq!(Decimal::zero().precision(), 1);
    assert_eq!(Decimal::new(0, 5), Decimal::zero());
    assert_eq!(Decimal::from(-42_i32), Decimal::new(-42, 0));
    assert_eq!(Decimal::new(1050, 2).to_i128_at(2), Some(1050));
    assert_eq!(Decimal::new(i128::MAX, 0).to_i128_at(1), None);
}
