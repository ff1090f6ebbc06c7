//! 注解中的物理单位，例如 `/// x: m`、`/// area: cm^2`、`/// v: m/s`。
//!
//! 单位只在引用无法解析为符号时才会被识别，这里不做任何量纲检查。

use chumsky::prelude::*;
use std::fmt;

/// SI 基本量纲，顺序决定输出顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseDimension {
    Time,
    Length,
    Mass,
    Current,
    Temperature,
    Amount,
    Luminosity,
}

impl BaseDimension {
    pub const ALL: [BaseDimension; 7] = [
        BaseDimension::Time,
        BaseDimension::Length,
        BaseDimension::Mass,
        BaseDimension::Current,
        BaseDimension::Temperature,
        BaseDimension::Amount,
        BaseDimension::Luminosity,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            BaseDimension::Time => "s",
            BaseDimension::Length => "m",
            BaseDimension::Mass => "kg",
            BaseDimension::Current => "A",
            BaseDimension::Temperature => "K",
            BaseDimension::Amount => "mol",
            BaseDimension::Luminosity => "cd",
        }
    }
}

/// `10^scale` 乘以各基本量纲的幂。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Unit {
    pub scale: i32,
    pub exponents: [i32; 7],
}

impl Unit {
    fn base(dimension: BaseDimension, scale: i32) -> Self {
        let mut exponents = [0; 7];
        exponents[dimension as usize] = 1;
        Self { scale, exponents }
    }

    pub fn exponent(&self, dimension: BaseDimension) -> i32 {
        self.exponents[dimension as usize]
    }

    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|e| *e == 0)
    }

    pub fn mul(self, other: Unit) -> Unit {
        let mut exponents = self.exponents;
        for (e, o) in exponents.iter_mut().zip(other.exponents) {
            *e += o;
        }
        Unit {
            scale: self.scale + other.scale,
            exponents,
        }
    }

    pub fn pow(self, n: i32) -> Unit {
        Unit {
            scale: self.scale * n,
            exponents: self.exponents.map(|e| e * n),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.scale != 0 {
            parts.push(format!("1e{}", self.scale));
        }
        for dimension in BaseDimension::ALL {
            match self.exponent(dimension) {
                0 => {}
                1 => parts.push(dimension.symbol().to_string()),
                n => parts.push(format!("{}^{}", dimension.symbol(), n)),
            }
        }
        if parts.is_empty() {
            return f.write_str("1");
        }
        f.write_str(&parts.join(" "))
    }
}

/// 不带前缀的单位符号。质量以 `g` 为基础，`kg` 由前缀 `k` 得到。
fn plain_symbol(symbol: &str) -> Option<Unit> {
    let unit = match symbol {
        "s" => Unit::base(BaseDimension::Time, 0),
        "m" => Unit::base(BaseDimension::Length, 0),
        "g" => Unit::base(BaseDimension::Mass, -3),
        "A" => Unit::base(BaseDimension::Current, 0),
        "K" => Unit::base(BaseDimension::Temperature, 0),
        "mol" => Unit::base(BaseDimension::Amount, 0),
        "cd" => Unit::base(BaseDimension::Luminosity, 0),
        "Hz" => Unit::base(BaseDimension::Time, 0).pow(-1),
        "N" => Unit::base(BaseDimension::Mass, 0)
            .mul(Unit::base(BaseDimension::Length, 0))
            .mul(Unit::base(BaseDimension::Time, 0).pow(-2)),
        _ => return None,
    };
    Some(unit)
}

fn prefix_scale(prefix: char) -> Option<i32> {
    match prefix {
        'G' => Some(9),
        'M' => Some(6),
        'k' => Some(3),
        'c' => Some(-2),
        'm' => Some(-3),
        'u' | 'µ' => Some(-6),
        'n' => Some(-9),
        _ => None,
    }
}

/// 先按完整符号查找（`cd`、`mol`、`m`），再尝试“前缀 + 符号”（`cm`、`ms`、`kg`）。
pub fn lookup_symbol(symbol: &str) -> Option<Unit> {
    if let Some(unit) = plain_symbol(symbol) {
        return Some(unit);
    }
    let mut chars = symbol.chars();
    let scale = prefix_scale(chars.next()?)?;
    let unit = plain_symbol(chars.as_str())?;
    Some(Unit {
        scale: unit.scale + scale,
        exponents: unit.exponents,
    })
}

type UnitError<'a> = extra::Err<Rich<'a, char>>;

fn unit_parser<'a>() -> impl Parser<'a, &'a str, Unit, UnitError<'a>> {
    let symbol = any()
        .filter(|c: &char| c.is_alphabetic())
        .repeated()
        .at_least(1)
        .to_slice()
        .try_map(|symbol: &str, span| {
            lookup_symbol(symbol).ok_or_else(|| Rich::custom(span, format!("unknown unit `{}`", symbol)))
        });

    let exponent = just('^')
        .ignore_then(just('-').or_not())
        .then(text::int(10))
        .try_map(|(minus, digits): (Option<char>, &str), span| {
            let n: i32 = digits
                .parse()
                .map_err(|_| Rich::custom(span, "exponent is too large"))?;
            Ok(if minus.is_some() { -n } else { n })
        });

    let term = symbol
        .then(exponent.or_not())
        .map(|(unit, n)| unit.pow(n.unwrap_or(1)));

    let op = choice((just('*').to(1), just('/').to(-1))).padded();

    term.clone()
        .foldl(op.then(term).repeated(), |acc, (sign, unit)| acc.mul(unit.pow(sign)))
        .padded()
        .then_ignore(end())
}

/// 把文本解析为单位；不是单位时返回 None。
pub fn parse_unit(text: &str) -> Option<Unit> {
    unit_parser().parse(text).into_result().ok()
}
