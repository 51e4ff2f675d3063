//! Row/column projection of the dataset for tabular display.

use crate::models::{SaleRecord, TableCell};

/// Column headers of the record table.
pub const TABLE_HEADER: [&str; 4] = ["ID", "Car", "Price", "Total Sales"];

/// Flatten records into a header row followed by one row per record.
///
/// Rows keep dataset order; the price is carried exactly as loaded.
pub fn cars_to_table(records: &[SaleRecord]) -> Vec<Vec<TableCell>> {
    let mut table = Vec::with_capacity(records.len() + 1);
    table.push(TABLE_HEADER.iter().map(|h| TableCell::from(*h)).collect());

    for record in records {
        table.push(vec![
            TableCell::Int(record.id),
            TableCell::Text(record.car.label()),
            TableCell::Text(record.price.clone()),
            TableCell::Count(record.total_sales),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CarInfo;

    fn record(id: i64, make: &str, price: &str, total_sales: u64) -> SaleRecord {
        SaleRecord {
            id,
            car: CarInfo {
                car_make: make.to_string(),
                car_model: "Base".to_string(),
                car_year: 2004,
            },
            price: price.to_string(),
            total_sales,
        }
    }

    #[test]
    fn test_header_row() {
        let table = cars_to_table(&[]);
        assert_eq!(table.len(), 1);
        let header: Vec<String> = table[0].iter().map(|c| c.to_string()).collect();
        assert_eq!(header, vec!["ID", "Car", "Price", "Total Sales"]);
    }

    #[test]
    fn test_rows_follow_dataset_order() {
        let records = vec![
            record(9, "Volvo", "$1,200.00", 4),
            record(3, "Audi", "$900.50", 11),
        ];

        let table = cars_to_table(&records);

        assert_eq!(table.len(), records.len() + 1);
        assert_eq!(
            table[1],
            vec![
                TableCell::Int(9),
                TableCell::Text("Volvo Base (2004)".to_string()),
                TableCell::Text("$1,200.00".to_string()),
                TableCell::Count(4),
            ]
        );
        assert_eq!(table[2][0], TableCell::Int(3));
    }
}
