use entgraph_core::{
    async_trait,
    driver::{
        operation::{CreateSpec, EdgeSpec, IdSpec, QuerySpec, UpdateSpec},
        Context, Executor, Operation, Response,
    },
    schema::{
        graph::{Identity, RelKind, TypeId},
        Schema, Step,
    },
    stmt::{Direction, FieldType, OrderTerm, Predicate, Record, Value},
    Error, Result,
};

use indexmap::IndexMap;
use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
    sync::Mutex,
};

type Row = IndexMap<String, Value>;

/// An executor storing rows in memory, following each edge step the way a
/// relational store would.
///
/// Tables holding a single `int` identity get their ids assigned on insert.
/// Columns flagged unique in the layout reject duplicate values with a
/// constraint error.
#[derive(Debug)]
pub struct MemoryExecutor {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    tables: HashMap<String, Table>,

    /// Type stored by each entity table
    types: HashMap<String, TypeId>,

    /// Auto-assigned identity column of each table
    auto_id: HashMap<String, String>,

    unique: HashMap<String, Vec<String>>,
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Row>,
    next_id: i64,
}

#[derive(Debug)]
struct ConstraintViolation(String);

impl std::error::Error for ConstraintViolation {}

impl std::fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UNIQUE constraint failed: {}", self.0)
    }
}

impl MemoryExecutor {
    pub fn new(schema: &Schema) -> MemoryExecutor {
        let mut state = State::default();

        for table in &schema.db.tables {
            state.tables.insert(table.name.clone(), Table::default());

            let unique = table
                .columns
                .iter()
                .filter(|column| column.unique && !column.primary_key)
                .map(|column| column.name.clone())
                .collect();
            state.unique.insert(table.name.clone(), unique);

            let Some(ty) = table.ty else { continue };
            state.types.insert(table.name.clone(), ty);

            let ty = schema.ty(ty);
            if let Identity::Single(id) = &ty.identity {
                let field = ty.field(*id);
                if field.ty == FieldType::Int {
                    state
                        .auto_id
                        .insert(table.name.clone(), field.column().to_string());
                }
            }
        }

        MemoryExecutor {
            state: Mutex::new(state),
        }
    }

    /// Number of rows currently stored in `table`.
    pub fn row_count(&self, table: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.tables.get(table).map_or(0, |table| table.rows.len())
    }

    /// Every stored row of `table`, in insertion order.
    pub fn rows(&self, table: &str) -> Vec<IndexMap<String, Value>> {
        let state = self.state.lock().unwrap();
        state
            .tables
            .get(table)
            .map(|table| table.rows.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Executor for MemoryExecutor {
    async fn exec(&self, _cx: &Context, op: Operation) -> Result<Response> {
        let mut state = self.state.lock().unwrap();

        match op {
            Operation::Create(spec) => Ok(Response::record(state.create(&spec)?)),
            Operation::CreateBulk(bulk) => {
                let mut records = vec![];
                for spec in &bulk.specs {
                    records.push(state.create(spec)?);
                }
                Ok(Response::records(records))
            }
            Operation::Update(spec) => {
                let rows = state.matching(&spec.node.table, &spec.predicate);
                for &index in &rows {
                    state.update(&spec, index)?;
                }
                Ok(Response::count(rows.len() as u64))
            }
            Operation::UpdateOne(spec) => {
                let first = state.matching(&spec.node.table, &spec.predicate).first().copied();
                let Some(index) = first else {
                    return Err(Error::record_not_found(format!(
                        "table={}; id={:?}",
                        spec.node.table,
                        spec.node.id.value()
                    )));
                };

                state.update(&spec, index)?;
                Ok(Response::record(state.hydrate(&spec.node.table, index, &spec.node.columns)))
            }
            Operation::Delete(spec) => {
                let rows: HashSet<_> = state.matching(&spec.table, &spec.predicate).into_iter().collect();
                let table = state.table_mut(&spec.table);

                let mut index = 0;
                table.rows.retain(|_| {
                    let keep = !rows.contains(&index);
                    index += 1;
                    keep
                });

                Ok(Response::count(rows.len() as u64))
            }
            Operation::Query(spec) => {
                let rows = state.select(&spec);
                Ok(Response::records(
                    rows.into_iter()
                        .map(|index| state.hydrate(&spec.table, index, &spec.columns))
                        .collect(),
                ))
            }
            Operation::Count(spec) => Ok(Response::count(state.select(&spec).len() as u64)),
        }
    }
}

impl State {
    fn table(&self, name: &str) -> &[Row] {
        self.tables.get(name).map_or(&[], |table| &table.rows[..])
    }

    fn table_mut(&mut self, name: &str) -> &mut Table {
        self.tables.entry(name.to_string()).or_default()
    }

    fn hydrate(&self, table: &str, index: usize, columns: &[String]) -> Record {
        let row = &self.table(table)[index];
        let mut record = Record::new(self.types.get(table).copied().unwrap_or(TypeId(usize::MAX)));

        for column in columns {
            record.set(column, row.get(column).cloned().unwrap_or_default());
        }

        record
    }

    fn insert(&mut self, table: &str, mut row: Row) -> Result<usize> {
        if let Some(column) = self.auto_id.get(table).cloned() {
            let assigned = row.get(&column).and_then(Value::as_int);
            let next = &mut self.table_mut(table).next_id;

            match assigned {
                Some(id) => *next = (*next).max(id),
                None => {
                    *next += 1;
                    row.insert(column, Value::Int(*next));
                }
            }
        }

        self.check_unique(table, &row, None)?;

        let rows = &mut self.table_mut(table).rows;
        rows.push(row);
        Ok(rows.len() - 1)
    }

    /// Fails if `row` repeats a unique column value of another row.
    fn check_unique(&self, table: &str, row: &Row, skip: Option<usize>) -> Result<()> {
        let Some(columns) = self.unique.get(table) else {
            return Ok(());
        };

        for column in columns {
            let Some(value) = row.get(column).filter(|value| !value.is_null()) else {
                continue;
            };

            let duplicate = self
                .table(table)
                .iter()
                .enumerate()
                .any(|(i, other)| Some(i) != skip && other.get(column) == Some(value));

            if duplicate {
                return Err(Error::driver_constraint(ConstraintViolation(format!(
                    "{table}.{column}"
                ))));
            }
        }

        Ok(())
    }

    fn create(&mut self, spec: &CreateSpec) -> Result<Record> {
        let table = &spec.node.table;

        let mut row: Row = spec
            .node
            .columns
            .iter()
            .map(|column| (column.clone(), Value::Null))
            .collect();

        match &spec.node.id {
            IdSpec::Single { column, value } => {
                if let Some(value) = value {
                    row.insert(column.clone(), value.clone());
                } else {
                    row.shift_remove(column);
                }
            }
            IdSpec::Composite { columns, values } => {
                for (column, value) in columns.iter().zip(values) {
                    if let Some(value) = value {
                        row.insert(column.clone(), value.clone());
                    }
                }
            }
        }

        for field in &spec.fields {
            row.insert(field.column.clone(), field.value.clone());
        }

        let index = self.insert(table, row)?;

        for edge in &spec.edges {
            self.add_edge(table, index, edge)?;
        }

        Ok(self.hydrate(table, index, &spec.node.columns))
    }

    fn update(&mut self, spec: &UpdateSpec, index: usize) -> Result<()> {
        let table = &spec.node.table;
        let mut row = self.table(table)[index].clone();

        for field in &spec.fields.set {
            row.insert(field.column.clone(), field.value.clone());
        }

        for field in &spec.fields.add {
            let current = row.get(&field.column).cloned().unwrap_or_default();
            let value = if current.is_null() {
                field.value.clone()
            } else {
                current.add(&field.value)?
            };
            row.insert(field.column.clone(), value);
        }

        for field in &spec.fields.append {
            let current = row.get(&field.column).cloned().unwrap_or_default();
            let value = if current.is_null() {
                field.value.clone()
            } else {
                current.append(&field.value)?
            };
            row.insert(field.column.clone(), value);
        }

        for field in &spec.fields.clear {
            row.insert(field.column.clone(), Value::Null);
        }

        self.check_unique(table, &row, Some(index))?;
        self.table_mut(table).rows[index] = row;

        for edge in &spec.edges.clear {
            self.clear_edge(table, index, edge);
        }

        for edge in &spec.edges.add {
            self.add_edge(table, index, edge)?;
        }

        Ok(())
    }

    fn add_edge(&mut self, table: &str, index: usize, edge: &EdgeSpec) -> Result<()> {
        let step = &edge.step;
        let Some(id) = edge.id.clone() else {
            entgraph_core::bail!("edge insert without a neighbor id; step={:?}", step.edge);
        };
        let source = self.table(table)[index]
            .get(&step.from.column)
            .cloned()
            .unwrap_or_default();

        if step.fk_on_source() {
            let column = step.fk_column().to_string();
            self.table_mut(table).rows[index].insert(column.clone(), id.clone());

            if step.bidi {
                for row in &mut self.table_mut(&step.to.table).rows {
                    if row.get(&step.to.column) == Some(&id) {
                        row.insert(column.clone(), source.clone());
                    }
                }
            }
        } else if step.fk_on_target() {
            let column = step.fk_column().to_string();
            let unique = step.rel == RelKind::O2O;

            for row in &mut self.table_mut(&step.edge_table).rows {
                if unique && row.get(&column) == Some(&source) {
                    row.insert(column.clone(), Value::Null);
                }
                if row.get(&step.to.column) == Some(&id) {
                    row.insert(column.clone(), source.clone());
                }
            }
        } else {
            let (c1, c2) = step.join_columns();
            let mut pairs = vec![(source.clone(), id.clone())];
            if step.bidi {
                pairs.push((id, source));
            }

            for (from, to) in pairs {
                let exists = self.table(&step.edge_table).iter().any(|row| {
                    row.get(c1) == Some(&from) && row.get(c2) == Some(&to)
                });
                if exists {
                    continue;
                }

                let mut row = Row::new();
                row.insert(c1.to_string(), from);
                row.insert(c2.to_string(), to);
                for field in &edge.fields {
                    row.insert(field.column.clone(), field.value.clone());
                }
                self.insert(&step.edge_table, row)?;
            }
        }

        Ok(())
    }

    fn clear_edge(&mut self, table: &str, index: usize, edge: &EdgeSpec) {
        let step = &edge.step;
        let source = self.table(table)[index]
            .get(&step.from.column)
            .cloned()
            .unwrap_or_default();
        let matches_id = |value: Option<&Value>| match &edge.id {
            Some(id) => value == Some(id),
            None => true,
        };

        if step.fk_on_source() {
            let column = step.fk_column().to_string();
            let current = self.table(table)[index].get(&column).cloned().unwrap_or_default();

            if current.is_null() || !matches_id(Some(&current)) {
                return;
            }

            self.table_mut(table).rows[index].insert(column.clone(), Value::Null);

            if step.bidi {
                for row in &mut self.table_mut(&step.to.table).rows {
                    if row.get(&column) == Some(&source) {
                        row.insert(column.clone(), Value::Null);
                    }
                }
            }
        } else if step.fk_on_target() {
            let column = step.fk_column().to_string();

            for row in &mut self.table_mut(&step.edge_table).rows {
                if row.get(&column) == Some(&source) && matches_id(row.get(&step.to.column)) {
                    row.insert(column.clone(), Value::Null);
                }
            }
        } else {
            let (c1, c2) = step.join_columns();
            let bidi = step.bidi;

            self.table_mut(&step.edge_table).rows.retain(|row| {
                let forward = row.get(c1) == Some(&source) && matches_id(row.get(c2));
                let backward = bidi && row.get(c2) == Some(&source) && matches_id(row.get(c1));
                !(forward || backward)
            });
        }
    }

    /// Indices of the rows of `table` matching `pred`.
    fn matching(&self, table: &str, pred: &Predicate) -> Vec<usize> {
        self.table(table)
            .iter()
            .enumerate()
            .filter(|(_, row)| self.eval(row, pred))
            .map(|(index, _)| index)
            .collect()
    }

    fn select(&self, spec: &QuerySpec) -> Vec<usize> {
        let mut rows = match &spec.from {
            Some(from) => {
                let mut rows = vec![];
                for source in self.select(&from.source) {
                    let source = &self.table(&from.source.table)[source];
                    rows.extend(self.neighbors(&from.step, source));
                }

                if spec.unique {
                    let mut seen = HashSet::new();
                    rows.retain(|index| seen.insert(*index));
                }

                rows.retain(|&index| self.eval(&self.table(&spec.table)[index], &spec.predicate));
                rows
            }
            None => self.matching(&spec.table, &spec.predicate),
        };

        if !spec.order.is_empty() {
            let table = self.table(&spec.table);
            rows.sort_by(|a, b| {
                for term in &spec.order {
                    let ord = self.order_key(term, &table[*a]).compare(&self.order_key(term, &table[*b]));
                    let ord = ord.unwrap_or(Ordering::Equal);
                    let ord = match term.dir() {
                        Direction::Asc => ord,
                        Direction::Desc => ord.reverse(),
                    };

                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            });
        }

        let offset = spec.offset.unwrap_or(0);
        let limit = spec.limit.unwrap_or(usize::MAX);
        rows.into_iter().skip(offset).take(limit).collect()
    }

    fn order_key(&self, term: &OrderTerm, row: &Row) -> Value {
        match term {
            OrderTerm::Field { column, .. } => row.get(column).cloned().unwrap_or_default(),
            OrderTerm::NeighborCount { step, .. } => {
                Value::Int(self.neighbors(step, row).len() as i64)
            }
            OrderTerm::NeighborField { step, column, .. } => self
                .neighbors(step, row)
                .first()
                .and_then(|&index| self.table(&step.to.table)[index].get(column).cloned())
                .unwrap_or_default(),
        }
    }

    /// Indices, in `step.to.table`, of the neighbors of `row` over `step`.
    fn neighbors(&self, step: &Step, row: &Row) -> Vec<usize> {
        let source = row.get(&step.from.column).cloned().unwrap_or_default();
        let targets = self.table(&step.to.table);

        let ids: Vec<Value> = if step.fk_on_source() {
            match row.get(step.fk_column()) {
                Some(id) if !id.is_null() => vec![id.clone()],
                _ => vec![],
            }
        } else if step.fk_on_target() {
            return targets
                .iter()
                .enumerate()
                .filter(|(_, target)| target.get(step.fk_column()) == Some(&source))
                .map(|(index, _)| index)
                .collect();
        } else {
            let (c1, c2) = step.join_columns();
            self.table(&step.edge_table)
                .iter()
                .filter(|join| join.get(c1) == Some(&source))
                .filter_map(|join| join.get(c2).cloned())
                .collect()
        };

        ids.iter()
            .flat_map(|id| {
                targets
                    .iter()
                    .enumerate()
                    .filter(move |(_, target)| target.get(&step.to.column) == Some(id))
                    .map(|(index, _)| index)
            })
            .collect()
    }

    fn eval(&self, row: &Row, pred: &Predicate) -> bool {
        const NULL: &Value = &Value::Null;

        match pred {
            Predicate::Compare { column, op, value } => {
                let lhs = row.get(column).unwrap_or(NULL);
                // NULL compares unequal to everything, as in SQL.
                if lhs.is_null() || value.is_null() {
                    return false;
                }
                op.eval(lhs, value)
            }
            Predicate::In {
                column,
                values,
                negate,
            } => {
                let lhs = row.get(column).unwrap_or(NULL);
                values.contains(lhs) != *negate
            }
            Predicate::IsNull { column, negate } => {
                row.get(column).unwrap_or(NULL).is_null() != *negate
            }
            Predicate::HasNeighbors { step, with } => {
                let targets = self.table(&step.to.table);
                self.neighbors(step, row).into_iter().any(|index| match with {
                    Some(with) => self.eval(&targets[index], with),
                    None => true,
                })
            }
            Predicate::And(preds) => preds.iter().all(|pred| self.eval(row, pred)),
            Predicate::Or(preds) => preds.iter().any(|pred| self.eval(row, pred)),
            Predicate::Not(pred) => !self.eval(row, pred),
            Predicate::Bool(value) => *value,
        }
    }
}
