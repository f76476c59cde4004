//! Spreadsheet export of both inventory resources.
//!
//! Workbooks are assembled fully in memory; the HTTP layer only attaches
//! headers and ships the bytes.

use models::category;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::errors::ServiceError;
use crate::product_service::ProductWithCategory;

const CATEGORY_COLUMNS: [&str; 3] = ["ID", "Name", "Description"];
const PRODUCT_COLUMNS: [&str; 5] = ["ID", "Name", "Price", "Quantity", "Category"];

/// Build an xlsx workbook listing every category.
pub fn categories_to_xlsx(categories: &[category::Model]) -> Result<Vec<u8>, ServiceError> {
    build(|wb| {
        let sheet = wb.add_worksheet();
        sheet.set_name("Categories")?;

        let header = header_format();
        for (col, title) in CATEGORY_COLUMNS.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, &header)?;
        }

        let body = body_format();
        for (i, c) in categories.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_number_with_format(row, 0, c.id as f64, &body)?;
            sheet.write_string_with_format(row, 1, &c.name, &body)?;
            sheet.write_string_with_format(row, 2, &c.description, &body)?;
        }

        sheet.autofit();
        Ok(())
    })
}

/// Build an xlsx workbook listing every product, with the category resolved to
/// its name.
pub fn products_to_xlsx(products: &[ProductWithCategory]) -> Result<Vec<u8>, ServiceError> {
    build(|wb| {
        let sheet = wb.add_worksheet();
        sheet.set_name("Products")?;

        let header = header_format();
        for (col, title) in PRODUCT_COLUMNS.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, &header)?;
        }

        let body = body_format();
        for (i, (p, cat)) in products.iter().enumerate() {
            let row = (i + 1) as u32;
            let category_name = cat.as_ref().map(|c| c.name.as_str()).unwrap_or_default();
            sheet.write_number_with_format(row, 0, p.id as f64, &body)?;
            sheet.write_string_with_format(row, 1, &p.name, &body)?;
            sheet.write_number_with_format(row, 2, f64::from(p.price), &body)?;
            sheet.write_number_with_format(row, 3, f64::from(p.quantity), &body)?;
            sheet.write_string_with_format(row, 4, category_name, &body)?;
        }

        sheet.autofit();
        Ok(())
    })
}

fn header_format() -> Format {
    Format::new().set_bold().set_font_size(16)
}

fn body_format() -> Format {
    Format::new().set_font_size(14)
}

fn build(fill: impl FnOnce(&mut Workbook) -> Result<(), XlsxError>) -> Result<Vec<u8>, ServiceError> {
    let mut wb = Workbook::new();
    fill(&mut wb).map_err(|e| ServiceError::Export(e.to_string()))?;
    wb.save_to_buffer().map_err(|e| ServiceError::Export(e.to_string()))
}
