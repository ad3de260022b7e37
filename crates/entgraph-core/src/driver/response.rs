use crate::{stmt::Record, Result};

#[derive(Debug, Clone)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug, Clone)]
pub enum Rows {
    /// Number of rows impacted by the operation, or counted by a query
    Count(u64),

    /// Hydrated rows
    Records(Vec<Record>),
}

impl Response {
    pub fn count(count: u64) -> Response {
        Response {
            rows: Rows::Count(count),
        }
    }

    pub fn records(records: Vec<Record>) -> Response {
        Response {
            rows: Rows::Records(records),
        }
    }

    pub fn record(record: Record) -> Response {
        Response::records(vec![record])
    }

    pub fn into_count(self) -> Result<u64> {
        match self.rows {
            Rows::Count(count) => Ok(count),
            Rows::Records(records) => crate::bail!(
                "expected a row count from the executor; got {} records",
                records.len()
            ),
        }
    }

    pub fn into_records(self) -> Result<Vec<Record>> {
        match self.rows {
            Rows::Records(records) => Ok(records),
            Rows::Count(count) => {
                crate::bail!("expected records from the executor; got count {count}")
            }
        }
    }

    /// Returns the single record of the response.
    pub fn into_record(self) -> Result<Record> {
        let mut records = self.into_records()?;
        match records.len() {
            1 => Ok(records.remove(0)),
            n => crate::bail!("expected exactly one record from the executor; got {n}"),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Rows::Count(_))
    }

    pub fn is_records(&self) -> bool {
        matches!(self, Rows::Records(_))
    }
}
