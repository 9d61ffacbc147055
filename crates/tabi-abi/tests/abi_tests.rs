//! Integration tests for the ABI coder, signature parser and contract helper

use tabi_abi::{
    format_signature, function_selector, get_address, parse_signature, AbiCoder, AbiConfig,
    AbiError, Contract, ErrorKind, Fragment, ParamType, Value, Values,
};
use tabi_primitives::{Address, BigNumber, U256};

fn word(hex_digits: &str) -> String {
    format!("{:0>64}", hex_digits)
}

// =============================================================================
// Wire layout
// =============================================================================

mod layout {
    use super::*;

    #[test]
    fn string_hi_literal() {
        let hex = AbiCoder::new().encode(&["string"], &[Value::from("hi")]).unwrap();
        let expected = format!(
            "0x{}{}{}",
            word("20"),
            word("2"),
            "6869000000000000000000000000000000000000000000000000000000000000"
        );
        assert_eq!(hex, expected);
    }

    #[test]
    fn uint256_array_literal() {
        let hex = AbiCoder::new()
            .encode(
                &["uint256[]"],
                &[Value::from(vec![Value::from(1), Value::from(2), Value::from(3)])],
            )
            .unwrap();
        let expected = format!(
            "0x{}{}{}{}{}",
            word("20"),
            word("3"),
            word("1"),
            word("2"),
            word("3")
        );
        assert_eq!(hex, expected);
    }

    #[test]
    fn static_types_take_one_word_each() {
        let types = ["uint8", "int256", "bool", "address", "bytes1", "bytes32"];
        let values = [
            Value::from(255),
            Value::from(-1),
            Value::Bool(true),
            Value::from("0x0000000000000000000000000000000000000000"),
            Value::Bytes(vec![0xff]),
            Value::Bytes(vec![0; 32]),
        ];
        let data = AbiCoder::new().encode_bytes(&types, &values).unwrap();
        assert_eq!(data.len(), 32 * types.len());
    }

    #[test]
    fn fixed_array_of_dynamic_uses_offsets() {
        let hex = AbiCoder::new()
            .encode(&["string[2]"], &[Value::from(vec![Value::from("a"), Value::from("b")])])
            .unwrap();
        let expected = format!(
            "0x{}{}{}{}{}{}{}",
            word("20"),
            word("40"),
            word("80"),
            word("1"),
            "6100000000000000000000000000000000000000000000000000000000000000",
            word("1"),
            "6200000000000000000000000000000000000000000000000000000000000000"
        );
        assert_eq!(hex, expected);
    }

    #[test]
    fn lowercase_hex_output() {
        let hex = AbiCoder::new().encode(&["bytes2"], &[Value::from("0xABCD")]).unwrap();
        assert!(hex.starts_with("0xabcd"));
        assert_eq!(hex, hex.to_lowercase());
    }
}

// =============================================================================
// Bounds
// =============================================================================

mod bounds {
    use super::*;

    #[test]
    fn uint8_limits() {
        let coder = AbiCoder::new();
        assert!(coder.encode(&["uint8"], &[Value::from(255)]).is_ok());
        let err = coder.encode(&["uint8"], &[Value::from(256)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.reason(), "invalid number value");
    }

    #[test]
    fn int8_limits() {
        let coder = AbiCoder::new();
        assert!(coder.encode(&["int8"], &[Value::from(-128)]).is_ok());
        assert!(coder.encode(&["int8"], &[Value::from(-129)]).is_err());
        assert!(coder.encode(&["int8"], &[Value::from(128)]).is_err());
    }

    #[test]
    fn uint256_rejects_negative() {
        let err = AbiCoder::new().encode(&["uint"], &[Value::from(-1)]).unwrap_err();
        assert_eq!(err.reason(), "invalid number value");
    }

    #[test]
    fn array_counts() {
        let coder = AbiCoder::new();
        let err = coder
            .encode(&["uint8[3]"], &[Value::from(vec![Value::from(1)])])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingArgument);
        let err = coder
            .encode(&["uint8[1]"], &[Value::from(vec![Value::from(1), Value::from(2)])])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedArgument);
    }
}

// =============================================================================
// Round trips
// =============================================================================

mod round_trip {
    use super::*;

    #[test]
    fn mixed_types() {
        let coder = AbiCoder::new();
        let types = [
            "uint256",
            "int64",
            "bytes",
            "string",
            "bool[]",
            "tuple(uint8 a, string b)[]",
        ];
        let values = [
            Value::from(U256::MAX),
            Value::from(-42),
            Value::Bytes(vec![1, 2, 3, 4, 5]),
            Value::from("héllo wörld"),
            Value::from(vec![Value::Bool(true), Value::Bool(false)]),
            Value::from(vec![
                Value::from(vec![Value::from(1), Value::from("x")]),
                Value::from(vec![Value::from(2), Value::from("yy")]),
            ]),
        ];

        let hex = coder.encode(&types, &values).unwrap();
        let decoded = coder.decode_hex(&types, &hex).unwrap();
        assert_eq!(decoded.as_slice(), &values);
        assert_eq!(coder.encode(&types, decoded.as_slice()).unwrap(), hex);
    }

    #[test]
    fn record_input() {
        let coder = AbiCoder::new();
        let types = ["tuple(address owner, uint256 amount) entry"];
        let record = Value::Record(
            [
                ("amount".to_string(), Value::from(5)),
                (
                    "owner".to_string(),
                    Value::from("0x8ba1f109551bd432803012645ac136ddd64dba72"),
                ),
            ]
            .into_iter()
            .collect(),
        );
        let hex = coder.encode(&types, &[record]).unwrap();
        let decoded = coder.decode_hex(&types, &hex).unwrap();
        let entry = decoded["entry"].as_list().unwrap();
        assert_eq!(entry["amount"], Value::from(5));
        assert_eq!(
            entry["owner"],
            Value::Address("0x8ba1f109551bD432803012645Ac136ddd64DBA72".to_string())
        );
    }

    #[test]
    fn param_types_and_strings_agree() {
        let coder = AbiCoder::new();
        let params = vec![
            ParamType::named("uint256", "n"),
            ParamType::tuple("t", vec![ParamType::new("bool"), ParamType::new("bytes")]),
        ];
        let values = [
            Value::from(9),
            Value::from(vec![Value::Bool(true), Value::Bytes(vec![0xaa])]),
        ];
        assert_eq!(
            coder.encode(&params, &values).unwrap(),
            coder.encode(&["uint256 n", "tuple(bool, bytes) t"], &values).unwrap()
        );
    }

    #[test]
    fn named_arrays_have_anonymous_elements() {
        let coder = AbiCoder::new();
        let types = ["uint256[] amounts", "tuple(uint8 x)[2] pts"];
        let values = [
            Value::from(vec![Value::from(1), Value::from(2), Value::from(3)]),
            Value::from(vec![
                Value::from(vec![Value::from(1)]),
                Value::from(vec![Value::from(2)]),
            ]),
        ];
        let decoded = coder.decode_hex(&types, &coder.encode(&types, &values).unwrap()).unwrap();

        let amounts = decoded["amounts"].as_list().unwrap();
        assert_eq!(amounts.aliases().count(), 0);

        let pts = decoded["pts"].as_list().unwrap();
        assert!(pts.get_named("pts").is_none());
        assert_eq!(pts.aliases().count(), 0);
        // tuple members keep their own names
        assert_eq!(pts[1].as_list().unwrap()["x"], Value::from(2));
    }

    #[test]
    fn truncated_data_fails() {
        let coder = AbiCoder::new();
        let data = coder.encode_bytes(&["string"], &[Value::from("hello")]).unwrap();
        let err = coder.decode(&["string"], &data[..68]).unwrap_err();
        assert_eq!(err.reason(), "insufficient data for dynamicBytes type");
    }
}

// =============================================================================
// Signatures
// =============================================================================

mod signatures {
    use super::*;

    #[test]
    fn transfer_signature() {
        let fragment = parse_signature("function transfer(address to, uint256 value)").unwrap();
        let Fragment::Function(function) = &fragment else {
            panic!("expected function");
        };
        assert_eq!(function.name.as_deref(), Some("transfer"));
        assert_eq!(
            function.inputs,
            vec![
                ParamType::named("address", "to"),
                ParamType::named("uint256", "value"),
            ]
        );
        assert!(function.outputs().is_empty());
        assert!(!function.constant);
        assert!(!function.payable);
        assert_eq!(format_signature(&fragment).unwrap(), "transfer(address,uint256)");
        assert_eq!(
            function_selector("transfer(address,uint256)").unwrap(),
            [0xa9, 0x05, 0x9c, 0xbb]
        );
    }

    #[test]
    fn fragment_serializes_to_json() {
        let fragment = parse_signature("function f(uint a) view returns (bool)").unwrap();
        let json = serde_json::to_value(&fragment).unwrap();
        assert_eq!(json["type"], "function");
        assert_eq!(json["name"], "f");
        assert_eq!(json["stateMutability"], "view");
        assert_eq!(json["inputs"][0]["type"], "uint256");
        assert_eq!(json["outputs"][0]["type"], "bool");
    }

    #[test]
    fn syntax_errors_name_the_position() {
        let err = AbiCoder::new().encode(&["uint256 a b"], &[Value::from(1)]).unwrap_err();
        assert!(matches!(err, AbiError::Syntax { position: 10, .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}

// =============================================================================
// Addresses
// =============================================================================

mod addresses {
    use super::*;

    #[test]
    fn checksum_acceptance() {
        let checksummed = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        assert_eq!(get_address(checksummed).unwrap(), checksummed);
        assert_eq!(get_address(&checksummed.to_lowercase()).unwrap(), checksummed);
        assert_eq!(
            get_address("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED").unwrap(),
            checksummed
        );
    }

    #[test]
    fn checksum_rejection() {
        assert!(get_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD").is_err());
        assert!(get_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeA").is_err());
    }

    #[test]
    fn icap_round_trip() {
        let icap = tabi_abi::get_icap_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap();
        assert_eq!(icap, "XE96ALC63SZ321UA5GPT42T9M6PT9FDD3AL");
        assert_eq!(
            get_address(&icap).unwrap(),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }
}

// =============================================================================
// Contract
// =============================================================================

mod contract {
    use super::*;

    #[test]
    fn call_round_trip() {
        let contract = Contract::from_signatures(&[
            "function swap(tuple(address token, uint256 amount)[] legs, uint256 deadline) returns (uint256)",
        ])
        .unwrap();
        let legs = Value::from(vec![Value::from(vec![
            Value::from("0x0000000000000000000000000000000000000002"),
            Value::from(10),
        ])]);
        let data = contract
            .encode_call("swap", &[legs.clone(), Value::from(99)])
            .unwrap();
        assert_eq!(
            contract.function("swap").unwrap().signature,
            "swap((address,uint256)[],uint256)"
        );

        let call = contract.decode_call(&data).unwrap();
        assert_eq!(call.name, "swap");
        assert_eq!(call.types, vec!["tuple(address,uint256)[]", "uint256"]);
        assert_eq!(call.inputs["legs"], legs);
        assert_eq!(call.inputs["deadline"], Value::from(99));
    }

    #[test]
    fn censored_contract_errors() {
        let config = AbiConfig {
            censor_errors: true,
            ..AbiConfig::default()
        };
        let contract =
            Contract::from_signatures_with_config(&["function f(uint8 x)"], config).unwrap();
        let err = contract.encode_call("f", &[Value::from(1000)]).unwrap_err();
        assert_eq!(err, AbiError::Censored);
    }
}

// =============================================================================
// Properties
// =============================================================================

mod properties {
    use super::*;
    use proptest::prelude::*;
    use tabi_abi::to_checksum_address;

    fn sample_values(
        big: [u8; 32],
        small: i64,
        flag: bool,
        blob: Vec<u8>,
        text: String,
        who: [u8; 20],
    ) -> Vec<Value> {
        vec![
            Value::from(U256::from_big_endian(&big)),
            Value::Int(BigNumber::from_i64(small)),
            Value::Bool(flag),
            Value::Bytes(blob),
            Value::String(text),
            Value::Address(to_checksum_address(&Address::from_bytes(who))),
        ]
    }

    const TYPES: [&str; 6] = ["uint256", "int64", "bool", "bytes", "string", "address"];

    proptest! {
        #[test]
        fn prop_round_trip(
            big in any::<[u8; 32]>(),
            small in any::<i64>(),
            flag in any::<bool>(),
            blob in proptest::collection::vec(any::<u8>(), 0..100),
            text in "\\PC{0,40}",
            who in any::<[u8; 20]>(),
        ) {
            let coder = AbiCoder::new();
            let values = sample_values(big, small, flag, blob, text, who);
            let data = coder.encode_bytes(&TYPES, &values).unwrap();
            let decoded = coder.decode(&TYPES, &data).unwrap();
            prop_assert_eq!(decoded, Values::from(values));
        }

        #[test]
        fn prop_nested_round_trip(
            amounts in proptest::collection::vec(any::<[u8; 32]>(), 0..8),
            id in any::<u64>(),
            label in "\\PC{0,20}",
            flags in proptest::collection::vec(any::<bool>(), 0..6),
            pair in ("\\PC{0,12}", "\\PC{0,12}"),
        ) {
            let coder = AbiCoder::new();
            let types = [
                "uint256[] amounts",
                "tuple(uint64 id, string label, bool[] flags) item",
                "string[2] pair",
            ];
            let values = vec![
                Value::from(
                    amounts
                        .iter()
                        .map(|word| Value::from(U256::from_big_endian(word)))
                        .collect::<Vec<_>>(),
                ),
                Value::from(vec![
                    Value::from(id),
                    Value::from(label),
                    Value::from(flags.into_iter().map(Value::Bool).collect::<Vec<_>>()),
                ]),
                Value::from(vec![Value::from(pair.0), Value::from(pair.1)]),
            ];
            let data = coder.encode_bytes(&types, &values).unwrap();
            let decoded = coder.decode(&types, &data).unwrap();
            prop_assert_eq!(decoded.as_slice(), values.as_slice());
            prop_assert_eq!(coder.encode_bytes(&types, decoded.as_slice()).unwrap(), data);
        }

        #[test]
        fn prop_encoding_is_deterministic(items in proptest::collection::vec(any::<u32>(), 0..20)) {
            let coder = AbiCoder::new();
            let list = Value::from(items.iter().map(|&n| Value::from(u64::from(n))).collect::<Vec<_>>());
            let first = coder.encode(&["uint32[]"], &[list.clone()]).unwrap();
            let second = coder.encode(&["uint32[]"], &[list]).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.len(), 2 + 64 * (2 + items.len()));
        }

        #[test]
        fn prop_static_size(count in 1usize..12) {
            let types = vec!["bytes32"; count];
            let values = vec![Value::Bytes(vec![0x11; 32]); count];
            let data = AbiCoder::new().encode_bytes(&types, &values).unwrap();
            prop_assert_eq!(data.len(), 32 * count);
        }

        #[test]
        fn prop_decode_never_panics(data in proptest::collection::vec(any::<u8>(), 0..200)) {
            let _ = AbiCoder::new().decode(&["string", "uint256[]", "bytes"], &data);
        }
    }
}
