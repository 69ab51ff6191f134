//! Splitting the enriched table into customers, dealers, cars and sales.

use crate::columns::{
    CAR_COLUMNS, CUSTOMER_COLUMNS, DEALER_COLUMNS, DEALER_ID, DEALER_NO, SALE_COLUMNS,
};
use crate::error::PipelineResult;
use crate::types::{DataSet, Field};

pub const CUSTOMERS_SHEET: &str = "Customers";
pub const DEALERS_SHEET: &str = "Dealers";
pub const CARS_SHEET: &str = "Cars";
pub const SALES_SHEET: &str = "Sales";

/// The four normalized tables, all projected from one cleaned snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Partitions {
    pub customers: DataSet,
    pub dealers: DataSet,
    pub cars: DataSet,
    pub sales: DataSet,
}

impl Partitions {
    /// Tables paired with their sheet names, in export order.
    pub fn sheets(&self) -> [(&'static str, &DataSet); 4] {
        [
            (CUSTOMERS_SHEET, &self.customers),
            (DEALERS_SHEET, &self.dealers),
            (CARS_SHEET, &self.cars),
            (SALES_SHEET, &self.sales),
        ]
    }

    /// Row count per sheet, in export order.
    pub fn row_counts(&self) -> [(&'static str, usize); 4] {
        self.sheets().map(|(name, ds)| (name, ds.row_count()))
    }
}

/// Build all four tables.
pub fn partition(dataset: &DataSet) -> PipelineResult<Partitions> {
    partition_with_progress(dataset, |_| {})
}

/// Like [`partition`], calling `on_table` with each sheet name once its table is built.
pub fn partition_with_progress<F>(dataset: &DataSet, mut on_table: F) -> PipelineResult<Partitions>
where
    F: FnMut(&'static str),
{
    let customers = dataset.select(&CUSTOMER_COLUMNS)?.distinct();
    on_table(CUSTOMERS_SHEET);

    let dealers = with_dealer_id(&dataset.select(&DEALER_COLUMNS)?.distinct())?;
    on_table(DEALERS_SHEET);

    let cars = dataset.select(&CAR_COLUMNS)?.distinct();
    on_table(CARS_SHEET);

    // One row per transaction; sales are not de-duplicated.
    let sales = with_dealer_id(&dataset.select(&SALE_COLUMNS)?)?;
    on_table(SALES_SHEET);

    Ok(Partitions {
        customers,
        dealers,
        cars,
        sales,
    })
}

/// Append `DealerID` as a verbatim copy of `Dealer_No`.
fn with_dealer_id(dataset: &DataSet) -> PipelineResult<DataSet> {
    let idx = dataset.schema.require(DEALER_NO)?;
    let data_type = dataset.schema.fields[idx].data_type.clone();
    Ok(dataset.with_column(Field::new(DEALER_ID, data_type), |row| row[idx].clone()))
}
