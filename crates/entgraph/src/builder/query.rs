use super::expect_ok;
use crate::{predicate, privacy, Client, Filter, Where};

use entgraph_core::{
    driver::{
        operation::{Neighbors, QuerySpec},
        Operation, Response,
    },
    schema::graph::{EdgeId, Type, TypeId},
    stmt::{Direction, OrderTerm, Record, Value},
    Context, Error, Result, Schema,
};

use std::{future::Future, pin::Pin};

/// Loads entities of one type.
#[derive(Debug, Clone)]
pub struct Query {
    client: Client,
    ty: TypeId,
    predicates: Vec<Where>,
    order: Vec<Order>,
    limit: Option<usize>,
    offset: Option<usize>,
    unique: Option<bool>,

    /// Set when the query selects neighbors of another query's entities
    from: Option<(EdgeId, Box<Query>)>,

    err: Option<Error>,
}

/// One ordering term, naming fields and edges by their declared names.
#[derive(Debug, Clone, PartialEq)]
pub enum Order {
    Field { name: String, dir: Direction },

    /// By the number of neighbors over the edge
    NeighborCount { edge: String, dir: Direction },

    /// By a field of the neighbor over a unique edge
    NeighborField {
        edge: String,
        field: String,
        dir: Direction,
    },
}

impl Order {
    pub fn asc(name: impl Into<String>) -> Order {
        Order::Field {
            name: name.into(),
            dir: Direction::Asc,
        }
    }

    pub fn desc(name: impl Into<String>) -> Order {
        Order::Field {
            name: name.into(),
            dir: Direction::Desc,
        }
    }

    pub fn neighbor_count(edge: impl Into<String>, dir: Direction) -> Order {
        Order::NeighborCount {
            edge: edge.into(),
            dir,
        }
    }

    pub fn neighbor_field(edge: impl Into<String>, field: impl Into<String>, dir: Direction) -> Order {
        Order::NeighborField {
            edge: edge.into(),
            field: field.into(),
            dir,
        }
    }

    fn lower(&self, schema: &Schema, ty: &Type) -> Result<OrderTerm> {
        Ok(match self {
            Order::Field { name, dir } => OrderTerm::Field {
                column: predicate::column(ty, name)?,
                dir: *dir,
            },
            Order::NeighborCount { edge, dir } => OrderTerm::NeighborCount {
                step: schema.step(edge_by_name(ty, edge)?.id).clone(),
                dir: *dir,
            },
            Order::NeighborField { edge, field, dir } => {
                let edge = edge_by_name(ty, edge)?;

                if !edge.unique {
                    return Err(Error::usage(format!(
                        "cannot order by a field of {}.{}: the edge is not unique",
                        ty.name, edge.name
                    )));
                }

                OrderTerm::NeighborField {
                    step: schema.step(edge.id).clone(),
                    column: predicate::column(schema.ty(edge.target), field)?,
                    dir: *dir,
                }
            }
        })
    }
}

impl Query {
    pub(crate) fn new(client: Client, ty: TypeId) -> Query {
        Query {
            client,
            ty,
            predicates: vec![],
            order: vec![],
            limit: None,
            offset: None,
            unique: None,
            from: None,
            err: None,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.ty
    }

    pub fn where_(mut self, pred: Where) -> Query {
        self.predicates.push(pred);
        self
    }

    pub fn limit(mut self, limit: usize) -> Query {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Query {
        self.offset = Some(offset);
        self
    }

    pub fn order(mut self, order: Order) -> Query {
        self.order.push(order);
        self
    }

    /// Selects distinct rows only. Neighbor queries are distinct unless this
    /// is set to `false`.
    pub fn unique(mut self, unique: bool) -> Query {
        self.unique = Some(unique);
        self
    }

    /// Returns a query for the neighbors of this query's entities over the
    /// named edge.
    pub fn query_edge(self, name: &str) -> Query {
        let ty = self.client.ty(self.ty);

        match ty.edge_by_name(name) {
            Some(edge) => {
                let (id, target) = (edge.id, edge.target);
                let mut query = Query::new(self.client.clone(), target);
                query.from = Some((id, Box::new(self)));
                query
            }
            None => {
                let err = Error::usage(format!("unknown edge \"{name}\" on type {}", ty.name));
                let mut query = self;
                query.err = Some(err);
                query
            }
        }
    }

    /// Returns every matching entity.
    pub async fn all(mut self, cx: &Context) -> Result<Vec<Record>> {
        let spec = self.prepare(cx).await?;
        self.run(cx, Operation::Query(spec)).await?.into_records()
    }

    pub async fn all_x(self, cx: &Context) -> Vec<Record> {
        expect_ok(self.all(cx).await)
    }

    /// Returns the first matching entity. Fails with `NotFound` if there is
    /// none.
    pub async fn first(self, cx: &Context) -> Result<Record> {
        let label = self.label();
        let mut records = self.limit(1).all(cx).await?;

        if records.is_empty() {
            return Err(Error::not_found(label));
        }

        Ok(records.swap_remove(0))
    }

    pub async fn first_x(self, cx: &Context) -> Record {
        expect_ok(self.first(cx).await)
    }

    pub async fn first_id(self, cx: &Context) -> Result<Value> {
        let label = self.label();
        let mut ids = self.limit(1).ids(cx).await?;

        if ids.is_empty() {
            return Err(Error::not_found(label));
        }

        Ok(ids.swap_remove(0))
    }

    pub async fn first_id_x(self, cx: &Context) -> Value {
        expect_ok(self.first_id(cx).await)
    }

    /// Returns the only matching entity. Fails with `NotFound` if there is
    /// none and `NotSingular` if there is more than one.
    pub async fn only(self, cx: &Context) -> Result<Record> {
        let label = self.label();
        let mut records = self.limit(2).all(cx).await?;

        match records.len() {
            0 => Err(Error::not_found(label)),
            1 => Ok(records.swap_remove(0)),
            _ => Err(Error::not_singular(label)),
        }
    }

    pub async fn only_x(self, cx: &Context) -> Record {
        expect_ok(self.only(cx).await)
    }

    pub async fn only_id(self, cx: &Context) -> Result<Value> {
        let label = self.label();
        let mut ids = self.limit(2).ids(cx).await?;

        match ids.len() {
            0 => Err(Error::not_found(label)),
            1 => Ok(ids.swap_remove(0)),
            _ => Err(Error::not_singular(label)),
        }
    }

    pub async fn only_id_x(self, cx: &Context) -> Value {
        expect_ok(self.only_id(cx).await)
    }

    /// Returns the ids of every matching entity. Composite identities are
    /// returned as lists.
    pub async fn ids(mut self, cx: &Context) -> Result<Vec<Value>> {
        let mut spec = self.prepare(cx).await?;

        let schema = self.client.schema().clone();
        let ty = schema.ty(self.ty);
        spec.columns = ty.id_columns();

        let records = self.run(cx, Operation::Query(spec)).await?.into_records()?;
        Ok(records.iter().map(|record| id_of(ty, record)).collect())
    }

    pub async fn ids_x(self, cx: &Context) -> Vec<Value> {
        expect_ok(self.ids(cx).await)
    }

    pub async fn count(mut self, cx: &Context) -> Result<u64> {
        let spec = self.prepare(cx).await?;
        self.run(cx, Operation::Count(spec)).await?.into_count()
    }

    pub async fn count_x(self, cx: &Context) -> u64 {
        expect_ok(self.count(cx).await)
    }

    pub async fn exist(self, cx: &Context) -> Result<bool> {
        Ok(!self.limit(1).ids(cx).await?.is_empty())
    }

    pub async fn exist_x(self, cx: &Context) -> bool {
        expect_ok(self.exist(cx).await)
    }

    fn label(&self) -> String {
        self.client.ty(self.ty).label()
    }

    async fn run(&self, cx: &Context, op: Operation) -> Result<Response> {
        self.client.querier(self.ty).query(cx, op).await
    }

    /// Evaluates the query policies of every type involved and lowers the
    /// query, source queries included.
    fn prepare<'a>(
        &'a mut self,
        cx: &'a Context,
    ) -> Pin<Box<dyn Future<Output = Result<QuerySpec>> + Send + 'a>> {
        Box::pin(async move {
            if let Some(err) = &self.err {
                return Err(err.clone());
            }

            let client = self.client.clone();
            privacy::eval_query(client.policies(self.ty), cx, self).await?;

            let schema = client.schema();
            let ty = schema.ty(self.ty);

            let mut spec = QuerySpec::new(&ty.table, ty.columns());
            spec.predicate = predicate::lower_all(&self.predicates, schema, self.ty)?;
            spec.order = self
                .order
                .iter()
                .map(|order| order.lower(schema, ty))
                .collect::<Result<_>>()?;
            spec.limit = self.limit;
            spec.offset = self.offset;
            spec.unique = self.unique.unwrap_or(false);

            if let Some((edge, source)) = &mut self.from {
                let source = source.prepare(cx).await?;
                spec.unique = self.unique.unwrap_or(true);
                spec.from = Some(Box::new(Neighbors {
                    step: schema.step(*edge).clone(),
                    source,
                }));
            }

            tracing::debug!(table = %spec.table, predicate = ?spec.predicate, "query");
            Ok(spec)
        })
    }
}

impl Filter for Query {
    fn where_(&mut self, pred: Where) {
        self.predicates.push(pred);
    }

    fn predicates(&self) -> &[Where] {
        &self.predicates
    }
}

fn edge_by_name<'a>(ty: &'a Type, name: &str) -> Result<&'a entgraph_core::schema::graph::Edge> {
    ty.edge_by_name(name)
        .ok_or_else(|| Error::usage(format!("unknown edge \"{name}\" on type {}", ty.name)))
}

/// The identity of a hydrated record.
pub(crate) fn id_of(ty: &Type, record: &Record) -> Value {
    if ty.has_composite_id() {
        Value::List(
            ty.id_columns()
                .iter()
                .map(|column| record.get(column).clone())
                .collect(),
        )
    } else {
        record.get(ty.id_column()).clone()
    }
}
