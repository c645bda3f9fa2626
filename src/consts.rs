use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Minimum valid year (inclusive)
pub const MIN_YEAR: u16 = 1;

/// Maximum valid year (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// Date component separator (`DD.MM.YYYY`)
pub const DATE_SEPARATOR: char = '.';
/// Exact byte length of a date in `DD.MM.YYYY` form
pub const DATE_TEXT_LEN: usize = 10;
/// Period separator (`DD.MM.YYYY-DD.MM.YYYY`)
pub const PERIOD_SEPARATOR: char = '-';

/// Fraction digits of the monetary result (kopecks)
pub const MONEY_SCALE: u32 = 2;

/// Daily share of the key rate owed to an individual: 1/300
pub const INDIVIDUAL_DAILY_DIVISOR: u32 = 300;
/// Daily share of the key rate owed to a legal entity: 1/150
pub const LEGAL_ENTITY_DAILY_DIVISOR: u32 = 150;
/// The statutory penalty for consumers is doubled
pub const PENALTY_FACTOR: u32 = 2;
/// Rates are stored as percentages
pub const PERCENT: u32 = 100;

/// Prices must stay below this amount (10^15)
pub const MAX_PRICE: Decimal = dec!(1000000000000000);
/// Highest key rate a table may carry, in percent
pub const MAX_RATE_PERCENT: Decimal = dec!(1000);
