//! Contract descriptors: a parsed ABI paired with optional deployment bytecode.
//!
//! Every parameter type is resolved into a [`DynSolType`] once, when the
//! descriptor is loaded. Encoding and decoding afterwards never re-parse type
//! strings, and a descriptor is never mutated after load, so it is shared
//! across bound instances behind an `Arc`.

use crate::{
    error::{BindError, EncodingError},
    value::{fits_declared_width, format_value, type_name, CallOutput},
};
use alloy_dyn_abi::{DynSolType, DynSolValue, Specifier};
use alloy_json_abi::{Event, Function, JsonAbi, Param, StateMutability};
use alloy_primitives::{hex, Bytes, Selector, B256, U256};
use alloy_sol_types::{Panic, Revert, SolError};

/// A function or constructor parameter with its resolved type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub ty: DynSolType,
}

/// An event parameter with its resolved type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFieldSpec {
    pub name: String,
    pub ty: DynSolType,
    pub indexed: bool,
}

/// A resolved ABI function.
#[derive(Debug, Clone)]
pub struct FunctionSpec {
    abi: Function,
    signature: String,
    selector: Selector,
    inputs: Vec<ParamSpec>,
    outputs: Vec<ParamSpec>,
}

impl FunctionSpec {
    fn resolve(contract: &str, function: &Function) -> Result<Self, BindError> {
        Ok(Self {
            abi: function.clone(),
            signature: function.signature(),
            selector: function.selector(),
            inputs: resolve_params(contract, &function.inputs)?,
            outputs: resolve_params(contract, &function.outputs)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.abi.name
    }

    /// Canonical signature, e.g. `transfer(address,uint256)`.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub const fn selector(&self) -> Selector {
        self.selector
    }

    pub fn inputs(&self) -> &[ParamSpec] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[ParamSpec] {
        &self.outputs
    }

    pub const fn abi(&self) -> &Function {
        &self.abi
    }

    pub fn is_payable(&self) -> bool {
        self.abi.state_mutability == StateMutability::Payable
    }

    /// Whether the function is declared `view` or `pure`.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self.abi.state_mutability,
            StateMutability::View | StateMutability::Pure
        )
    }

    /// Type-check `args` against the declared inputs and build the calldata.
    pub fn encode_input(&self, args: &[DynSolValue]) -> Result<Bytes, EncodingError> {
        check_args(&self.signature, &self.inputs, args)?;

        let mut data = self.selector.to_vec();
        data.extend(DynSolValue::Tuple(args.to_vec()).abi_encode_params());
        Ok(data.into())
    }

    /// Decode raw return data against the declared outputs.
    pub fn decode_output(&self, data: &[u8]) -> Result<CallOutput, BindError> {
        if self.outputs.is_empty() {
            return Ok(CallOutput::Unit);
        }

        let mut values = decode_params(&self.signature, &self.outputs, data)?;
        if values.len() == 1 {
            return Ok(CallOutput::Value(values.remove(0)));
        }

        let fields = self
            .outputs
            .iter()
            .zip(values)
            .enumerate()
            .map(|(index, (param, value))| {
                let name = if param.name.is_empty() {
                    format!("output{index}")
                } else {
                    param.name.clone()
                };
                (name, value)
            })
            .collect();
        Ok(CallOutput::Record(fields))
    }
}

/// A resolved ABI event.
#[derive(Debug, Clone)]
pub struct EventSpec {
    abi: Event,
    signature: String,
    selector: B256,
    fields: Vec<EventFieldSpec>,
}

impl EventSpec {
    fn resolve(contract: &str, event: &Event) -> Result<Self, BindError> {
        let fields = event
            .inputs
            .iter()
            .map(|param| {
                Ok(EventFieldSpec {
                    name: param.name.clone(),
                    ty: param.resolve().map_err(|e| malformed_abi(contract, e))?,
                    indexed: param.indexed,
                })
            })
            .collect::<Result<_, BindError>>()?;

        Ok(Self {
            abi: event.clone(),
            signature: event.signature(),
            selector: event.selector(),
            fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.abi.name
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Topic 0 of every non-anonymous log emitted for this event.
    pub const fn selector(&self) -> B256 {
        self.selector
    }

    pub const fn is_anonymous(&self) -> bool {
        self.abi.anonymous
    }

    pub fn fields(&self) -> &[EventFieldSpec] {
        &self.fields
    }

    pub fn indexed_fields(&self) -> impl Iterator<Item = &EventFieldSpec> {
        self.fields.iter().filter(|field| field.indexed)
    }

    pub const fn abi(&self) -> &Event {
        &self.abi
    }
}

#[derive(Debug, Clone)]
struct ErrorSpec {
    name: String,
    selector: Selector,
    inputs: Vec<ParamSpec>,
}

/// Immutable metadata of one contract type.
#[derive(Debug, Clone)]
pub struct ContractDescriptor {
    name: String,
    abi: JsonAbi,
    bytecode: Option<Bytes>,
    constructor: Vec<ParamSpec>,
    constructor_payable: bool,
    functions: Vec<FunctionSpec>,
    events: Vec<EventSpec>,
    errors: Vec<ErrorSpec>,
}

impl ContractDescriptor {
    /// Parse an ABI JSON array and an optional hex bytecode blob.
    pub fn load(
        name: impl Into<String>,
        abi_json: &str,
        bytecode: Option<&str>,
    ) -> Result<Self, BindError> {
        let name = name.into();
        let abi: JsonAbi =
            serde_json::from_str(abi_json).map_err(|e| malformed_abi(&name, e))?;
        let bytecode = bytecode
            .map(|code| parse_bytecode(&name, code))
            .transpose()?
            .flatten();

        Self::from_abi(name, abi, bytecode)
    }

    /// Build a descriptor from an already parsed ABI.
    pub fn from_abi(
        name: impl Into<String>,
        abi: JsonAbi,
        bytecode: Option<Bytes>,
    ) -> Result<Self, BindError> {
        let name = name.into();

        let (constructor, constructor_payable) = match &abi.constructor {
            Some(constructor) => (
                resolve_params(&name, &constructor.inputs)?,
                constructor.state_mutability == StateMutability::Payable,
            ),
            None => (Vec::new(), false),
        };

        let functions = abi
            .functions()
            .map(|function| FunctionSpec::resolve(&name, function))
            .collect::<Result<_, _>>()?;
        let events = abi
            .events()
            .map(|event| EventSpec::resolve(&name, event))
            .collect::<Result<_, _>>()?;
        let errors = abi
            .errors()
            .map(|error| {
                Ok(ErrorSpec {
                    name: error.name.clone(),
                    selector: error.selector(),
                    inputs: resolve_params(&name, &error.inputs)?,
                })
            })
            .collect::<Result<_, BindError>>()?;

        Ok(Self {
            name,
            abi,
            bytecode,
            constructor,
            constructor_payable,
            functions,
            events,
            errors,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    pub const fn bytecode(&self) -> Option<&Bytes> {
        self.bytecode.as_ref()
    }

    pub fn functions(&self) -> &[FunctionSpec] {
        &self.functions
    }

    pub fn events(&self) -> &[EventSpec] {
        &self.events
    }

    pub fn constructor_inputs(&self) -> &[ParamSpec] {
        &self.constructor
    }

    /// Look up a function by plain name or by full signature.
    ///
    /// A plain name that matches several overloads is rejected; callers must
    /// spell out the signature instead.
    pub fn function(&self, name: &str) -> Result<&FunctionSpec, BindError> {
        let mut matches = self.functions.iter().filter(|function| {
            if name.contains('(') {
                function.signature == name
            } else {
                function.name() == name
            }
        });

        let Some(first) = matches.next() else {
            return Err(BindError::UnknownFunction {
                contract: self.name.clone(),
                name: name.to_string(),
            });
        };
        let rest: Vec<_> = matches.collect();
        if rest.is_empty() {
            return Ok(first);
        }

        Err(BindError::AmbiguousFunction {
            contract: self.name.clone(),
            name: name.to_string(),
            candidates: std::iter::once(first)
                .chain(rest)
                .map(|function| function.signature.clone())
                .collect(),
        })
    }

    pub fn function_by_selector(&self, selector: Selector) -> Result<&FunctionSpec, BindError> {
        self.functions
            .iter()
            .find(|function| function.selector == selector)
            .ok_or_else(|| BindError::UnknownFunction {
                contract: self.name.clone(),
                name: selector.to_string(),
            })
    }

    /// Look up an event by plain name or by full signature.
    pub fn event(&self, name: &str) -> Result<&EventSpec, BindError> {
        let matches: Vec<_> = self
            .events
            .iter()
            .filter(|event| {
                if name.contains('(') {
                    event.signature == name
                } else {
                    event.name() == name
                }
            })
            .collect();

        match matches.as_slice() {
            [] => Err(BindError::UnknownEvent {
                contract: self.name.clone(),
                name: name.to_string(),
            }),
            [event] => Ok(*event),
            _ => Err(BindError::AmbiguousEvent {
                contract: self.name.clone(),
                name: name.to_string(),
                candidates: matches.iter().map(|e| e.signature.clone()).collect(),
            }),
        }
    }

    /// Whether plain value transfers are accepted (`receive` or payable `fallback`).
    pub fn accepts_value_transfer(&self) -> bool {
        self.abi.receive.is_some()
            || self
                .abi
                .fallback
                .as_ref()
                .is_some_and(|fallback| fallback.state_mutability == StateMutability::Payable)
    }

    /// Creation code followed by the encoded constructor arguments.
    pub fn deploy_code(&self, args: &[DynSolValue], value: U256) -> Result<Bytes, BindError> {
        let bytecode = self
            .bytecode
            .as_ref()
            .ok_or_else(|| BindError::MissingBytecode(self.name.clone()))?;

        if !value.is_zero() && !self.constructor_payable {
            return Err(EncodingError::NonPayable {
                method: format!("{} constructor", self.name),
                value,
            }
            .into());
        }
        check_args(&format!("{} constructor", self.name), &self.constructor, args)?;

        let mut code = bytecode.to_vec();
        code.extend(DynSolValue::Tuple(args.to_vec()).abi_encode_params());
        Ok(code.into())
    }

    /// Best-effort decoding of revert data into a readable reason.
    ///
    /// Custom errors declared in this ABI are tried first, then the standard
    /// `Error(string)` payload, whose reason is returned verbatim, and
    /// `Panic(uint256)`, rendered as `Panic(0x..)`.
    pub fn decode_revert(&self, data: &[u8]) -> Option<String> {
        let (selector, body) = data.split_first_chunk::<4>()?;

        let custom = self
            .errors
            .iter()
            .find(|error| error.selector.as_slice() == selector.as_slice());
        if let Some(error) = custom {
            let values = decode_params(&error.name, &error.inputs, body).ok()?;
            let args = values.iter().map(format_value).collect::<Vec<_>>();
            return Some(format!("{}({})", error.name, args.join(", ")));
        }

        if *selector == Revert::SELECTOR {
            return Revert::abi_decode(data).ok().map(|revert| revert.reason);
        }
        if *selector == Panic::SELECTOR {
            return Panic::abi_decode(data)
                .ok()
                .map(|panic| format!("Panic({:#x})", panic.code));
        }
        None
    }

    /// Re-serialize the ABI as a JSON array.
    pub fn to_json(&self) -> Result<String, BindError> {
        serde_json::to_string(&self.abi).map_err(|e| malformed_abi(&self.name, e))
    }
}

pub(crate) fn check_args(
    method: &str,
    params: &[ParamSpec],
    args: &[DynSolValue],
) -> Result<(), EncodingError> {
    if params.len() != args.len() {
        return Err(EncodingError::ArgumentCount {
            method: method.to_string(),
            expected: params.len(),
            got: args.len(),
        });
    }

    for (index, (param, arg)) in params.iter().zip(args).enumerate() {
        if !param.ty.matches(arg) {
            return Err(EncodingError::ArgumentType {
                method: method.to_string(),
                index,
                name: param.name.clone(),
                expected: param.ty.sol_type_name().into_owned(),
                got: type_name(arg),
            });
        }
        if !fits_declared_width(arg) {
            return Err(EncodingError::ArgumentRange {
                method: method.to_string(),
                index,
                name: param.name.clone(),
                expected: param.ty.sol_type_name().into_owned(),
            });
        }
    }

    Ok(())
}

/// Decode `data` as the ABI encoding of `params`.
///
/// The decoder reads words leniently, so the result is checked against the
/// input: integers must fit their width, and re-encoding must reproduce the
/// input (a `bool` word is 0 or 1, address and padding bytes are zero).
/// Trailing bytes past the encoding are ignored.
pub(crate) fn decode_params(
    context: &str,
    params: &[ParamSpec],
    data: &[u8],
) -> Result<Vec<DynSolValue>, BindError> {
    let ty = DynSolType::Tuple(params.iter().map(|param| param.ty.clone()).collect());
    let decoded = ty
        .abi_decode_params(data)
        .map_err(|e| BindError::decode(context, e))?;
    ensure_canonical(context, &decoded, &decoded.abi_encode_params(), data)?;

    match decoded {
        DynSolValue::Tuple(values) => Ok(values),
        other => Err(BindError::decode(
            context,
            format!("expected a tuple, got {}", type_name(&other)),
        )),
    }
}

/// Reject a decoded value that does not round-trip to the bytes it came from.
pub(crate) fn ensure_canonical(
    context: &str,
    decoded: &DynSolValue,
    encoded: &[u8],
    data: &[u8],
) -> Result<(), BindError> {
    if !fits_declared_width(decoded) {
        return Err(BindError::decode(
            context,
            "value does not fit its declared type",
        ));
    }
    if !data.starts_with(encoded) {
        return Err(BindError::decode(context, "non-canonical encoding"));
    }
    Ok(())
}

fn resolve_params(contract: &str, params: &[Param]) -> Result<Vec<ParamSpec>, BindError> {
    params
        .iter()
        .map(|param| {
            Ok(ParamSpec {
                name: param.name.clone(),
                ty: param.resolve().map_err(|e| malformed_abi(contract, e))?,
            })
        })
        .collect()
}

fn parse_bytecode(contract: &str, code: &str) -> Result<Option<Bytes>, BindError> {
    let code = code.trim();
    if code.is_empty() || code == "0x" {
        return Ok(None);
    }

    hex::decode(code)
        .map(|bytes| Some(bytes.into()))
        .map_err(|e| BindError::MalformedBytecode {
            contract: contract.to_string(),
            reason: e.to_string(),
        })
}

fn malformed_abi(contract: &str, reason: impl ToString) -> BindError {
    BindError::MalformedAbi {
        contract: contract.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TOKEN_ABI, TOKEN_BYTECODE};
    use alloy_primitives::{address, keccak256, Address, I256};
    use alloy_sol_types::{Panic, Revert, SolError};

    fn token() -> ContractDescriptor {
        ContractDescriptor::load("Token", TOKEN_ABI, Some(TOKEN_BYTECODE)).unwrap()
    }

    #[test]
    fn test_load_resolves_functions_and_events() {
        let descriptor = token();
        let transfer = descriptor.function("transfer").unwrap();
        assert_eq!(transfer.signature(), "transfer(address,uint256)");
        assert_eq!(transfer.selector(), Selector::from([0xa9, 0x05, 0x9c, 0xbb]));

        let event = descriptor.event("Transfer").unwrap();
        assert_eq!(event.selector(), keccak256("Transfer(address,address,uint256)"));
        assert_eq!(event.indexed_fields().count(), 2);
        assert!(descriptor.bytecode().is_some());
    }

    #[test]
    fn test_malformed_inputs_are_rejected() {
        let err = ContractDescriptor::load("Broken", "{not json", None).unwrap_err();
        assert!(matches!(err, BindError::MalformedAbi { .. }));

        let bad_type = r#"[{"type":"function","name":"f","inputs":[{"name":"x","type":"uint7"}],"outputs":[],"stateMutability":"view"}]"#;
        let err = ContractDescriptor::load("Broken", bad_type, None).unwrap_err();
        assert!(matches!(err, BindError::MalformedAbi { .. }));

        let err = ContractDescriptor::load("Broken", TOKEN_ABI, Some("0xzz")).unwrap_err();
        assert!(matches!(err, BindError::MalformedBytecode { .. }));
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let descriptor = token();
        let json = descriptor.to_json().unwrap();
        let reloaded = ContractDescriptor::load("Token", &json, None).unwrap();
        assert_eq!(reloaded.abi(), descriptor.abi());
        assert_eq!(reloaded.functions().len(), descriptor.functions().len());
    }

    #[test]
    fn test_overloads_require_signature() {
        let descriptor = token();
        let err = descriptor.function("safeTransfer").unwrap_err();
        match err {
            BindError::AmbiguousFunction { candidates, .. } => {
                assert_eq!(candidates.len(), 2);
                assert!(candidates.contains(&"safeTransfer(address,bytes)".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }

        let spec = descriptor.function("safeTransfer(address)").unwrap();
        assert_eq!(spec.inputs().len(), 1);
        assert!(matches!(
            descriptor.function("mint"),
            Err(BindError::UnknownFunction { .. })
        ));
    }

    #[test]
    fn test_argument_order_changes_payload() {
        let descriptor = token();
        let transfer = descriptor.function("transfer").unwrap();
        let to = address!("0x00000000000000000000000000000000000000aa");

        let data = transfer
            .encode_input(&[DynSolValue::Address(to), DynSolValue::Uint(U256::from(7), 256)])
            .unwrap();
        assert_eq!(&data[..4], transfer.selector().as_slice());
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(&data[16..36], to.as_slice());
        assert_eq!(data[67], 7);

        let swapped = transfer.encode_input(&[
            DynSolValue::Uint(U256::from(7), 256),
            DynSolValue::Address(to),
        ]);
        assert!(matches!(
            swapped,
            Err(EncodingError::ArgumentType { index: 0, .. })
        ));
    }

    #[test]
    fn test_argument_count_mismatch() {
        let descriptor = token();
        let err = descriptor
            .function("balanceOf")
            .unwrap()
            .encode_input(&[])
            .unwrap_err();
        assert_eq!(
            err,
            EncodingError::ArgumentCount {
                method: "balanceOf(address)".to_string(),
                expected: 1,
                got: 0,
            }
        );
    }

    #[test]
    fn test_decode_output_shapes() {
        let descriptor = token();

        let mut word = [0u8; 32];
        word[31] = 0x2a;
        let output = descriptor
            .function("balanceOf")
            .unwrap()
            .decode_output(&word)
            .unwrap();
        assert_eq!(output, CallOutput::Value(DynSolValue::Uint(U256::from(42), 256)));

        let checkpoint = descriptor.function("checkpoint").unwrap();
        let data = DynSolValue::Tuple(vec![
            DynSolValue::Address(Address::repeat_byte(0x11)),
            DynSolValue::Uint(U256::from(9), 128),
        ])
        .abi_encode_params();
        let output = checkpoint.decode_output(&data).unwrap();
        assert_eq!(
            output.field("submitter"),
            Some(&DynSolValue::Address(Address::repeat_byte(0x11)))
        );
        assert_eq!(
            output.field("output1"),
            Some(&DynSolValue::Uint(U256::from(9), 128))
        );

        let deposit = descriptor.function("deposit").unwrap();
        assert_eq!(deposit.decode_output(&[]).unwrap(), CallOutput::Unit);
    }

    #[test]
    fn test_decode_output_rejects_short_data() {
        let descriptor = token();
        let err = descriptor
            .function("balanceOf")
            .unwrap()
            .decode_output(&[0u8; 7])
            .unwrap_err();
        assert!(matches!(err, BindError::Decode { .. }));
    }

    #[test]
    fn test_deploy_code_appends_constructor_args() {
        let descriptor = token();
        let args = [
            DynSolValue::String("Kroma".to_string()),
            DynSolValue::Uint(U256::from(1_000), 256),
        ];
        let code = descriptor.deploy_code(&args, U256::ZERO).unwrap();
        let bytecode = descriptor.bytecode().unwrap();
        assert!(code.starts_with(bytecode));
        assert_eq!(
            &code[bytecode.len()..],
            DynSolValue::Tuple(args.to_vec()).abi_encode_params().as_slice()
        );

        let err = descriptor.deploy_code(&args, U256::from(1)).unwrap_err();
        assert!(matches!(
            err,
            BindError::Encoding(EncodingError::NonPayable { .. })
        ));

        let bare = ContractDescriptor::load("Token", TOKEN_ABI, None).unwrap();
        assert_eq!(
            bare.deploy_code(&args, U256::ZERO).unwrap_err(),
            BindError::MissingBytecode("Token".to_string())
        );
    }

    #[test]
    fn test_decode_revert_reasons() {
        let descriptor = token();

        let standard = Revert {
            reason: "bond is locked".to_string(),
        }
        .abi_encode();
        assert_eq!(
            descriptor.decode_revert(&standard).as_deref(),
            Some("bond is locked")
        );

        let custom = descriptor
            .abi()
            .errors()
            .find(|error| error.name == "InsufficientBalance")
            .unwrap();
        let mut data = custom.selector().to_vec();
        data.extend(
            DynSolValue::Tuple(vec![
                DynSolValue::Uint(U256::from(1), 256),
                DynSolValue::Uint(U256::from(5), 256),
            ])
            .abi_encode_params(),
        );
        assert_eq!(
            descriptor.decode_revert(&data).as_deref(),
            Some("InsufficientBalance(1, 5)")
        );
    }

    #[test]
    fn test_decode_revert_panic_and_unknown() {
        let descriptor = token();

        let panic = Panic {
            code: U256::from(0x11),
        }
        .abi_encode();
        assert_eq!(
            descriptor.decode_revert(&panic).as_deref(),
            Some("Panic(0x11)")
        );

        assert_eq!(descriptor.decode_revert(&[0xde, 0xad, 0xbe, 0xef]), None);
        assert_eq!(descriptor.decode_revert(&[0x08]), None);
    }

    #[test]
    fn test_decode_output_rejects_non_canonical_words() {
        let descriptor = token();

        let mut flag = [0u8; 32];
        flag[31] = 2;
        let err = descriptor
            .function("transfer")
            .unwrap()
            .decode_output(&flag)
            .unwrap_err();
        assert!(matches!(err, BindError::Decode { .. }));

        let checkpoint = descriptor.function("checkpoint").unwrap();
        let mut data = DynSolValue::Tuple(vec![
            DynSolValue::Address(Address::repeat_byte(0x11)),
            DynSolValue::Uint(U256::from(9), 128),
        ])
        .abi_encode_params();
        data[0] = 0xff;
        assert!(matches!(
            checkpoint.decode_output(&data),
            Err(BindError::Decode { .. })
        ));

        let mut wide = DynSolValue::Tuple(vec![
            DynSolValue::Address(Address::repeat_byte(0x11)),
            DynSolValue::Uint(U256::from(9), 128),
        ])
        .abi_encode_params();
        wide[40] = 1;
        assert!(matches!(
            checkpoint.decode_output(&wide),
            Err(BindError::Decode { .. })
        ));
    }

    #[test]
    fn test_out_of_range_arguments_are_rejected() {
        let descriptor = token();
        let abi = r#"[{"type":"function","name":"setFee","inputs":[{"name":"bps","type":"uint8"},{"name":"delta","type":"int16"}],"outputs":[],"stateMutability":"nonpayable"}]"#;
        let fees = ContractDescriptor::load("Fees", abi, None).unwrap();
        let set_fee = fees.function("setFee").unwrap();

        assert!(set_fee
            .encode_input(&[
                DynSolValue::Uint(U256::from(255), 8),
                DynSolValue::Int(I256::try_from(-32768i64).unwrap(), 16),
            ])
            .is_ok());

        let err = set_fee
            .encode_input(&[
                DynSolValue::Uint(U256::from(256), 8),
                DynSolValue::Int(I256::ZERO, 16),
            ])
            .unwrap_err();
        assert_eq!(
            err,
            EncodingError::ArgumentRange {
                method: "setFee(uint8,int16)".to_string(),
                index: 0,
                name: "bps".to_string(),
                expected: "uint8".to_string(),
            }
        );

        let err = set_fee
            .encode_input(&[
                DynSolValue::Uint(U256::from(1), 8),
                DynSolValue::Int(I256::try_from(40_000i64).unwrap(), 16),
            ])
            .unwrap_err();
        assert!(matches!(err, EncodingError::ArgumentRange { index: 1, .. }));

        let transfer = descriptor.function("transfer").unwrap();
        assert!(transfer
            .encode_input(&[
                DynSolValue::Address(Address::ZERO),
                DynSolValue::Uint(U256::MAX, 256),
            ])
            .is_ok());
    }

    #[test]
    fn test_value_transfer_support() {
        assert!(token().accepts_value_transfer());

        let abi = r#"[{"type":"function","name":"owner","inputs":[],"outputs":[{"name":"","type":"address"}],"stateMutability":"view"}]"#;
        let plain = ContractDescriptor::load("Plain", abi, None).unwrap();
        assert!(!plain.accepts_value_transfer());
    }
}
