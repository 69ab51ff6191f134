//! In-memory transformations of the sales table.
//!
//! Each stage takes a [`crate::types::DataSet`] snapshot and returns a new one:
//!
//! - [`clean()`]: missing-value defaults, coercion, invalid-row and outlier removal, name
//!   normalization
//! - [`enrich()`]: calendar columns and the income segment
//! - [`partition()`]: the customers/dealers/cars/sales tables
//!
//! The helpers in [`reduce`] compute the column statistics the cleaner needs.
//!
//! ## Example: clean → enrich → partition
//!
//! ```rust
//! use car_sales_preprocessing::columns::raw_schema;
//! use car_sales_preprocessing::ingestion::ingest_csv_from_reader;
//! use car_sales_preprocessing::processing::{clean, enrich, partition, DEFAULT_ZSCORE_THRESHOLD};
//!
//! let header = "Car_id,Date,Customer Name,Gender,Annual Income,Dealer_Name,Company,Model,\
//!     Engine,Transmission,Color,Price,Dealer_No,Body Style,Phone,Dealer_Region";
//! let mut csv = String::from(header);
//! for (i, price) in ["21000", "19500", "oops", "20500"].iter().enumerate() {
//!     csv.push_str(&format!(
//!         "\nC_{i},1/{}/2022, ann lee ,,45000,buddy motors,Ford,Focus,DOHC,Auto,Red,{price},\
//!          D1,Sedan,,Austin",
//!         i + 1
//!     ));
//! }
//! let mut rdr = csv::Reader::from_reader(csv.as_bytes());
//! let raw = ingest_csv_from_reader(&mut rdr, &raw_schema()).unwrap();
//!
//! let cleaned = clean(&raw, DEFAULT_ZSCORE_THRESHOLD).unwrap();
//! assert_eq!(cleaned.row_count(), 3);
//!
//! let parts = partition(&enrich(&cleaned).unwrap()).unwrap();
//! assert_eq!(parts.customers.row_count(), 1);
//! assert_eq!(parts.sales.row_count(), 3);
//! ```

pub mod clean;
pub mod coerce;
pub mod enrich;
pub mod partition;
pub mod reduce;

pub use clean::{clean, clean_with_progress, DEFAULT_ZSCORE_THRESHOLD};
pub use enrich::{enrich, enrich_with_progress, IncomeSegment};
pub use partition::{partition, partition_with_progress, Partitions};
