use super::{hash_of, DEVICE_DATA};
use crate::data::{DataKey, DataPtr};
use crate::ir::{Node, NodeCore, NodePtr, OpKind, Output};
use crate::lowering::{LoweringContext, NodeError, OpList};
use std::sync::Arc;

/// Leaf node wrapping input data; lowers to a computation parameter.
pub struct DeviceData {
    core: NodeCore,
    data: DataPtr,
}

impl DeviceData {
    #[track_caller]
    pub fn new(data: DataPtr) -> Self {
        let core = NodeCore::new(
            OpKind::new(DEVICE_DATA),
            Vec::new(),
            data.shape().clone(),
            hash_of(&DataKey::of(&data)),
        );
        Self { core, data }
    }

    pub fn data(&self) -> &DataPtr {
        &self.data
    }
}

impl Node for DeviceData {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn lower(&self, loctx: &mut LoweringContext) -> Result<OpList, NodeError> {
        let op = loctx.get_parameter(&self.data);
        Ok(loctx.return_ops(&self.core, vec![op]))
    }

    fn clone_with_operands(&self, _operands: Vec<Output>) -> NodePtr {
        Arc::new(DeviceData::new(Arc::clone(&self.data)))
    }

    fn describe(&self) -> Option<String> {
        Some(format!("device={}", self.data.device()))
    }
}
