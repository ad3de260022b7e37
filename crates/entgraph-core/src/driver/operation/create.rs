use super::*;

#[derive(Debug, Clone)]
pub struct CreateSpec {
    pub node: NodeSpec,

    /// Column values, defaults included
    pub fields: Vec<FieldSpec>,

    /// Edges to insert together with the node
    pub edges: Vec<EdgeSpec>,
}

#[derive(Debug, Clone)]
pub struct CreateBulk {
    pub specs: Vec<CreateSpec>,
}

impl From<CreateSpec> for Operation {
    fn from(value: CreateSpec) -> Operation {
        Operation::Create(value)
    }
}

impl From<CreateBulk> for Operation {
    fn from(value: CreateBulk) -> Operation {
        Operation::CreateBulk(value)
    }
}
