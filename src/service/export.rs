use bigdecimal::BigDecimal;
use csv::Writer;
use std::io::Write;

use crate::models::ReconciledRecord;

const HEADER: [&str; 7] = [
    "item_name",
    "quantity",
    "billed_price",
    "reference_price",
    "expected_price",
    "excess_amount",
    "status",
];

/// 将 Option<BigDecimal> 转换为 CSV 字符串
fn option_to_csv(val: &Option<BigDecimal>) -> String {
    val.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

/// 导出核对结果为 CSV (表头为规范字段名)
pub fn write_csv<W: Write>(records: &[ReconciledRecord], out: W) -> Result<(), csv::Error> {
    let mut writer = Writer::from_writer(out);
    writer.write_record(HEADER)?;

    for record in records {
        writer.write_record(&[
            record.item_name.clone(),
            record.quantity.to_string(),
            record.billed_price.to_string(),
            option_to_csv(&record.reference_price),
            option_to_csv(&record.expected_price),
            option_to_csv(&record.excess_amount),
            record.status.as_str().to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn to_csv_bytes(records: &[ReconciledRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    Ok(buf)
}
