//! IR Builders
//!
//! `IrBuilder` constructs functions from scratch, block by block.
//! `OpBuilder` inserts new operations into an existing function right
//! before a fixed anchor operation, which is how rewrites emit code.

use log::trace;
use plir_common::{TempId, LabelId, SourceLocation};
use crate::{
    Attribute, AttributeMap, BasicBlock, Function, Instruction, IrBinaryOp, IrError, IrType,
    OpId, Operation, Value,
};

struct OpenLoop {
    induction: TempId,
    lower: Value,
    upper: Value,
    step: Value,
    body: Vec<Operation>,
    location: Option<SourceLocation>,
}

/// Builder for constructing IR
pub struct IrBuilder {
    current_function: Option<Function>,
    current_block: Option<LabelId>,
    open_loops: Vec<OpenLoop>,
    location: Option<SourceLocation>,
    next_temp_id: TempId,
    next_label_id: LabelId,
}

impl IrBuilder {
    pub fn new() -> Self {
        Self {
            current_function: None,
            current_block: None,
            open_loops: Vec::new(),
            location: None,
            next_temp_id: 0,
            next_label_id: 0,
        }
    }

    pub fn new_temp(&mut self) -> TempId {
        let temp = self.next_temp_id;
        self.next_temp_id += 1;
        temp
    }

    pub fn new_label(&mut self) -> LabelId {
        let label = self.next_label_id;
        self.next_label_id += 1;
        label
    }

    pub fn create_function(&mut self, name: &str, return_type: IrType) -> &mut Function {
        // Temporaries and labels are numbered per function
        self.next_temp_id = 0;
        self.next_label_id = 0;
        self.current_block = None;
        self.open_loops.clear();
        self.current_function.insert(Function::new(name.to_string(), return_type))
    }

    /// Add a parameter to the current function, returning its temporary
    pub fn add_parameter(&mut self, param_type: IrType) -> Result<TempId, IrError> {
        let param_id = self.new_temp();
        let function = self
            .current_function
            .as_mut()
            .ok_or_else(|| IrError::builder("No current function"))?;
        function.add_parameter(param_id, param_type);
        Ok(param_id)
    }

    pub fn create_block(&mut self, label_id: LabelId) -> Result<(), IrError> {
        if !self.open_loops.is_empty() {
            return Err(IrError::builder("Cannot start a block inside an open loop"));
        }
        let function = self
            .current_function
            .as_mut()
            .ok_or_else(|| IrError::builder("No current function"))?;
        function.add_block(BasicBlock::new(label_id));
        self.current_block = Some(label_id);
        Ok(())
    }

    /// Location attached to every operation built from now on
    pub fn set_location(&mut self, location: Option<SourceLocation>) {
        self.location = location;
    }

    pub fn build_binary(
        &mut self,
        op: IrBinaryOp,
        lhs: Value,
        rhs: Value,
        result_type: IrType,
    ) -> Result<TempId, IrError> {
        let result = self.new_temp();
        self.add_instruction(Instruction::Binary { result, op, lhs, rhs, result_type })?;
        Ok(result)
    }

    pub fn build_constant(&mut self, value: Value, result_type: IrType) -> Result<TempId, IrError> {
        let result = self.new_temp();
        self.add_instruction(Instruction::Constant { result, value, result_type })?;
        Ok(result)
    }

    pub fn build_call(
        &mut self,
        function: Value,
        args: Vec<Value>,
        result_type: IrType,
    ) -> Result<Option<TempId>, IrError> {
        let result = if matches!(result_type, IrType::Void) {
            None
        } else {
            Some(self.new_temp())
        };
        self.add_instruction(Instruction::Call { result, function, args, result_type })?;
        Ok(result)
    }

    /// Print `args`, with an optional `format` attribute
    pub fn build_print(&mut self, args: Vec<Value>, format: Option<&str>) -> Result<(), IrError> {
        let mut attributes = AttributeMap::new();
        if let Some(format) = format {
            attributes.insert("format".to_string(), Attribute::String(format.to_string()));
        }
        self.build_print_with_attributes(args, attributes)
    }

    pub fn build_print_with_attributes(
        &mut self,
        args: Vec<Value>,
        attributes: AttributeMap,
    ) -> Result<(), IrError> {
        self.add_instruction(Instruction::Print { args, attributes })
    }

    /// Open a `for` loop; operations built until `end_for` form its body.
    /// Returns the induction variable.
    pub fn begin_for(
        &mut self,
        lower: Value,
        upper: Value,
        step: Value,
    ) -> Result<TempId, IrError> {
        if self.current_block.is_none() {
            return Err(IrError::builder("No current block"));
        }
        let induction = self.new_temp();
        self.open_loops.push(OpenLoop {
            induction,
            lower,
            upper,
            step,
            body: Vec::new(),
            location: self.location.clone(),
        });
        Ok(induction)
    }

    pub fn end_for(&mut self) -> Result<(), IrError> {
        let open = self
            .open_loops
            .pop()
            .ok_or_else(|| IrError::builder("No open loop to close"))?;
        let mut op = Operation::new(Instruction::For {
            induction: open.induction,
            lower: open.lower,
            upper: open.upper,
            step: open.step,
            body: open.body,
        });
        op.location = open.location;
        self.push_operation(op)
    }

    pub fn build_return(&mut self, value: Option<Value>) -> Result<(), IrError> {
        self.add_instruction(Instruction::Return(value))
    }

    pub fn build_comment(&mut self, text: &str) -> Result<(), IrError> {
        self.add_instruction(Instruction::Comment(text.to_string()))
    }

    fn add_instruction(&mut self, inst: Instruction) -> Result<(), IrError> {
        let mut op = Operation::new(inst);
        op.location = self.location.clone();
        self.push_operation(op)
    }

    fn push_operation(&mut self, op: Operation) -> Result<(), IrError> {
        if let Some(open) = self.open_loops.last_mut() {
            open.body.push(op);
            return Ok(());
        }
        let function = self
            .current_function
            .as_mut()
            .ok_or_else(|| IrError::builder("No current function"))?;
        let block_id = self
            .current_block
            .ok_or_else(|| IrError::builder("No current block"))?;
        let block = function
            .get_block_mut(block_id)
            .ok_or_else(|| IrError::builder("Current block not found"))?;
        block.add_operation(op);
        Ok(())
    }

    /// Finish the current function, assigning operation ids
    pub fn finish_function(&mut self) -> Result<Function, IrError> {
        if !self.open_loops.is_empty() {
            return Err(IrError::builder("Function finished with an open loop"));
        }
        let mut function = self
            .current_function
            .take()
            .ok_or_else(|| IrError::builder("No current function"))?;
        self.current_block = None;
        function.assign_ids();
        Ok(function)
    }
}

impl Default for IrBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Inserts operations into a function immediately before an anchor
/// operation. Inserted operations inherit the anchor's location.
pub struct OpBuilder<'f> {
    function: &'f mut Function,
    anchor: OpId,
    location: Option<SourceLocation>,
}

impl<'f> OpBuilder<'f> {
    pub fn before(function: &'f mut Function, anchor: OpId) -> Result<Self, IrError> {
        let location = function
            .find_op(anchor)
            .ok_or_else(|| IrError::OperationNotFound {
                function: function.name.clone(),
                id: anchor,
            })?
            .location
            .clone();
        Ok(Self { function, anchor, location })
    }

    pub fn function(&self) -> &Function {
        self.function
    }

    pub fn insert(&mut self, inst: Instruction) -> Result<OpId, IrError> {
        trace!("  {}: insert `{}` before {}", self.function.name, inst, self.anchor);
        let mut op = Operation::new(inst);
        op.location = self.location.clone();
        self.function.insert_before(self.anchor, op)
    }

    pub fn build_constant(&mut self, value: Value, result_type: IrType) -> Result<Value, IrError> {
        let result = self.function.new_temp();
        self.insert(Instruction::Constant { result, value, result_type })?;
        Ok(Value::Temp(result))
    }

    pub fn build_address_of(
        &mut self,
        global: &str,
        result_type: IrType,
    ) -> Result<Value, IrError> {
        let result = self.function.new_temp();
        self.insert(Instruction::AddressOf { result, global: global.to_string(), result_type })?;
        Ok(Value::Temp(result))
    }

    pub fn build_gep(
        &mut self,
        ptr: Value,
        indices: Vec<Value>,
        result_type: IrType,
    ) -> Result<Value, IrError> {
        let result = self.function.new_temp();
        self.insert(Instruction::GetElementPtr { result, ptr, indices, result_type })?;
        Ok(Value::Temp(result))
    }

    pub fn build_call(
        &mut self,
        function: Value,
        args: Vec<Value>,
        result_type: IrType,
    ) -> Result<Option<TempId>, IrError> {
        let result = if matches!(result_type, IrType::Void) {
            None
        } else {
            Some(self.function.new_temp())
        };
        self.insert(Instruction::Call { result, function, args, result_type })?;
        Ok(result)
    }
}
