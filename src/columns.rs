//! Column names of the car sales dataset and the tables derived from it.

use crate::types::{DataType, Field, Schema};

pub const CUSTOMER_NAME: &str = "Customer Name";
pub const GENDER: &str = "Gender";
pub const ANNUAL_INCOME: &str = "Annual Income";
pub const PHONE: &str = "Phone";
pub const PRICE: &str = "Price";
pub const DATE: &str = "Date";
pub const DEALER_NO: &str = "Dealer_No";
pub const DEALER_NAME: &str = "Dealer_Name";
pub const DEALER_REGION: &str = "Dealer_Region";
pub const CAR_ID: &str = "Car_id";
pub const COMPANY: &str = "Company";
pub const MODEL: &str = "Model";
pub const ENGINE: &str = "Engine";
pub const TRANSMISSION: &str = "Transmission";
pub const COLOR: &str = "Color";
pub const BODY_STYLE: &str = "Body Style";

// Derived by the enrichment and partition stages.
pub const YEAR: &str = "Year";
pub const MONTH: &str = "Month";
pub const DAY_OF_WEEK: &str = "DayOfWeek";
pub const QUARTER: &str = "Quarter";
pub const INCOME_SEGMENT: &str = "IncomeSegment";
pub const DEALER_ID: &str = "DealerID";

pub const CUSTOMER_COLUMNS: [&str; 4] = [CUSTOMER_NAME, GENDER, ANNUAL_INCOME, PHONE];
pub const DEALER_COLUMNS: [&str; 3] = [DEALER_NO, DEALER_NAME, DEALER_REGION];
pub const CAR_COLUMNS: [&str; 7] = [
    CAR_ID,
    COMPANY,
    MODEL,
    ENGINE,
    TRANSMISSION,
    COLOR,
    BODY_STYLE,
];
pub const SALE_COLUMNS: [&str; 4] = [CAR_ID, DATE, PRICE, DEALER_NO];

/// Columns the loader requires, with the types they are parsed into.
///
/// `Price` and `Date` stay text at load time; the cleaner coerces them and turns bad values into
/// nulls instead of failing the load.
pub fn raw_schema() -> Schema {
    Schema::new(vec![
        Field::new(CUSTOMER_NAME, DataType::Utf8),
        Field::new(GENDER, DataType::Utf8),
        Field::new(ANNUAL_INCOME, DataType::Float64),
        Field::new(PHONE, DataType::Utf8),
        Field::new(PRICE, DataType::Utf8),
        Field::new(DATE, DataType::Utf8),
        Field::new(DEALER_NO, DataType::Utf8),
        Field::new(DEALER_NAME, DataType::Utf8),
        Field::new(DEALER_REGION, DataType::Utf8),
        Field::new(CAR_ID, DataType::Utf8),
        Field::new(COMPANY, DataType::Utf8),
        Field::new(MODEL, DataType::Utf8),
        Field::new(ENGINE, DataType::Utf8),
        Field::new(TRANSMISSION, DataType::Utf8),
        Field::new(COLOR, DataType::Utf8),
        Field::new(BODY_STYLE, DataType::Utf8),
    ])
}
