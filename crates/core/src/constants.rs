use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal places used for valuation output (currency cents)
pub const VALUATION_DECIMAL_PRECISION: u32 = 2;

/// Decimal places used for projection output (whole currency units)
pub const PROJECTION_DECIMAL_PRECISION: u32 = 0;

/// Reference monthly rate for the simulator's base scenario
pub const BASE_MONTHLY_RATE: Decimal = dec!(0.032);

/// Multiplier applied to the base rate for the conservative scenario
pub const CONSERVATIVE_RATE_FACTOR: Decimal = dec!(0.7);

/// Multiplier applied to the base rate for the aggressive scenario
pub const AGGRESSIVE_RATE_FACTOR: Decimal = dec!(1.5);

/// Longest projection horizon accepted by the simulator (50 years)
pub const MAX_PROJECTION_MONTHS: u32 = 600;

/// Lowest admissible monthly return: a total loss of capital
pub const MIN_RETURN_PERCENTAGE: Decimal = dec!(-100);

/// Notice period between a withdrawal request and fund availability
pub const WITHDRAWAL_NOTICE_DAYS: i64 = 30;

/// Default interval between PIX status polls
pub const PIX_POLL_INTERVAL_MS: u64 = 5_000;

/// Default interval of the PIX expiry countdown
pub const PIX_COUNTDOWN_INTERVAL_MS: u64 = 1_000;

/// Default upper bound on a single PIX status query
pub const PIX_QUERY_TIMEOUT_MS: u64 = 15_000;
