//! Named wallet and blockchain RPCs.
//!
//! Each entry of [`METHODS`] describes one daemon RPC: its wire name and
//! positional parameters, with defaults for the trailing optional ones. The
//! same table generates a typed, chainable wrapper on [`RpcClient`] per
//! entry. Wrappers take required parameters directly and optional ones as
//! `Option<_>`, substituting the table default for `None`, then queue the
//! call exactly like [`RpcClient::call`].

use serde_json::Value;

use crate::error::CoreError;

use super::client::RpcClient;
use super::Transport;

use ParamDefault::{Bool, Int, Str};

/// Default for an optional positional parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDefault {
    Str(&'static str),
    Int(i64),
    Bool(bool),
}

impl ParamDefault {
    pub fn to_value(self) -> Value {
        match self {
            ParamDefault::Str(s) => Value::from(s),
            ParamDefault::Int(n) => Value::from(n),
            ParamDefault::Bool(b) => Value::from(b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub default: Option<ParamDefault>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSpec {
    pub rpc_name: &'static str,
    pub params: &'static [ParamSpec],
}

impl MethodSpec {
    /// Number of leading parameters without a default.
    pub fn required(&self) -> usize {
        self.params.iter().filter(|p| p.default.is_none()).count()
    }

    /// Turn caller-supplied positional args into the full param list,
    /// appending defaults for omitted trailing parameters.
    pub fn bind(&self, mut args: Vec<Value>) -> Result<Vec<Value>, CoreError> {
        let supplied = args.len();
        let required = self.required();
        if supplied < required {
            return Err(self.invalid_arguments(format!(
                "expected at least {required} argument(s), got {supplied}; usage: {}",
                self.usage()
            )));
        }
        if supplied > self.params.len() {
            return Err(self.invalid_arguments(format!(
                "expected at most {} argument(s), got {supplied}; usage: {}",
                self.params.len(),
                self.usage()
            )));
        }

        args.extend(
            self.params[supplied..]
                .iter()
                .filter_map(|p| p.default)
                .map(ParamDefault::to_value),
        );
        Ok(args)
    }

    /// One-line usage, e.g. `getbalance [account=""] [min_conf=6]`.
    pub fn usage(&self) -> String {
        let mut usage = self.rpc_name.to_owned();
        for param in self.params {
            match param.default {
                None => usage.push_str(&format!(" <{}>", param.name)),
                Some(default) => {
                    usage.push_str(&format!(" [{}={}]", param.name, default.to_value()))
                }
            }
        }
        usage
    }

    fn invalid_arguments(&self, message: String) -> CoreError {
        CoreError::InvalidArguments {
            method: self.rpc_name.to_owned(),
            message,
        }
    }
}

/// Find a catalog entry by wire name, ignoring ASCII case.
pub fn lookup(name: &str) -> Option<&'static MethodSpec> {
    METHODS
        .iter()
        .find(|spec| spec.rpc_name.eq_ignore_ascii_case(name))
}

macro_rules! rpc_methods {
    ($(
        $(#[doc = $doc:literal])*
        $fn_name:ident => $rpc_name:literal
            ($($arg:ident: $arg_ty:ty),*)
            [$($opt:ident: $opt_ty:ty = $default:expr),*];
    )+) => {
        /// Every RPC with a typed wrapper, in declaration order.
        pub static METHODS: &[MethodSpec] = &[
            $(
                MethodSpec {
                    rpc_name: $rpc_name,
                    params: &[
                        $(ParamSpec { name: stringify!($arg), default: None },)*
                        $(ParamSpec { name: stringify!($opt), default: Some($default) },)*
                    ],
                },
            )+
        ];

        impl<T: Transport> RpcClient<T> {
            $(
                $(#[doc = $doc])*
                pub fn $fn_name(&mut self, $($arg: $arg_ty,)* $($opt: Option<$opt_ty>,)*) -> &mut Self {
                    let params: Vec<Value> = vec![
                        $(Value::from($arg),)*
                        $($opt.map_or_else(|| $default.to_value(), Value::from),)*
                    ];
                    self.call($rpc_name, params)
                }
            )+
        }
    };
}

rpc_methods! {
    // --- node and network ----------------------------------------------------

    /// General node, wallet and chain state.
    get_info => "getinfo" () [];
    get_mining_info => "getmininginfo" () [];
    get_peer_info => "getpeerinfo" () [];
    get_connection_count => "getconnectioncount" () [];
    get_net_totals => "getnettotals" () [];
    /// `command` is one of `add`, `remove` or `onetry`.
    add_node => "addnode" (node: &str, command: &str) [];
    get_added_node_info => "getaddednodeinfo" () [dns: bool = Bool(true)];
    ping => "ping" () [];
    help => "help" () [command: &str = Str("")];
    stop => "stop" () [];

    // --- blockchain ----------------------------------------------------------

    get_block => "getblock" (block_hash: &str) [];
    get_block_count => "getblockcount" () [];
    get_block_hash => "getblockhash" (index: u64) [];
    get_best_block_hash => "getbestblockhash" () [];
    get_difficulty => "getdifficulty" () [];
    get_raw_mempool => "getrawmempool" () [];
    get_tx_out => "gettxout" (txid: &str, vout: u64) [include_mempool: bool = Bool(true)];

    // --- wallet security -----------------------------------------------------

    /// Unlock the wallet. With `mint_only` the unlocked wallet may only stake.
    wallet_passphrase => "walletpassphrase"
        (passphrase: &str)
        [timeout: u64 = Int(99_999_999), mint_only: bool = Bool(true)];
    wallet_passphrase_change => "walletpassphrasechange"
        (old_passphrase: &str, new_passphrase: &str) [];
    wallet_lock => "walletlock" () [];
    encrypt_wallet => "encryptwallet" (passphrase: &str) [];
    backup_wallet => "backupwallet" (destination: &str) [];
    keypool_refill => "keypoolrefill" () [];
    dump_priv_key => "dumpprivkey" (address: &str) [];
    import_priv_key => "importprivkey" (wif: &str) [label: &str = Str("")];

    // --- accounts and addresses ----------------------------------------------

    get_balance => "getbalance"
        () [account: &str = Str(""), min_conf: u64 = Int(6)];
    get_received_by_address => "getreceivedbyaddress"
        () [address: &str = Str(""), min_conf: u64 = Int(1)];
    get_received_by_account => "getreceivedbyaccount"
        () [account: &str = Str(""), min_conf: u64 = Int(1)];
    get_addresses_by_account => "getaddressesbyaccount" () [account: &str = Str("")];
    get_new_address => "getnewaddress" () [label: &str = Str("")];
    get_account => "getaccount" () [address: &str = Str("")];
    get_account_address => "getaccountaddress" (account: &str) [];
    set_account => "setaccount" (address: &str, account: &str) [];
    validate_address => "validateaddress" (address: &str) [];
    list_accounts => "listaccounts" () [min_conf: u64 = Int(1)];
    list_received_by_address => "listreceivedbyaddress"
        () [min_conf: u64 = Int(0), include_empty: bool = Bool(true)];
    list_received_by_account => "listreceivedbyaccount"
        () [min_conf: u64 = Int(0), include_empty: bool = Bool(true)];

    // --- sending -------------------------------------------------------------

    send_to_address => "sendtoaddress" (address: &str, amount: f64) [comment: &str = Str("")];
    send_from => "sendfrom" (account: &str, address: &str, amount: f64) [];
    /// `recipients` is a JSON object mapping address to amount.
    send_many => "sendmany"
        (recipients: Value) [account: &str = Str(""), comment: &str = Str("")];
    /// Move funds between two wallet accounts (`move` on the wire).
    move_funds => "move" (from_account: &str, to_account: &str, amount: f64) [];
    set_tx_fee => "settxfee" (amount: f64) [];

    // --- transactions --------------------------------------------------------

    get_transaction => "gettransaction" (txid: &str) [];
    get_raw_transaction => "getrawtransaction" (txid: &str) [verbose: u64 = Int(0)];
    list_transactions => "listtransactions"
        () [account: &str = Str(""), count: u64 = Int(999), from: u64 = Int(0)];
    list_since_block => "listsinceblock" () [block_hash: &str = Str("")];
    list_unspent => "listunspent" () [min_conf: u64 = Int(1), max_conf: u64 = Int(999_999)];
    /// `outputs` is a JSON array of `{"txid", "vout"}` objects.
    lock_unspent => "lockunspent" (unlock: bool, outputs: Value) [];
    list_lock_unspent => "listlockunspent" () [];
    /// `inputs` is a JSON array of `{"txid", "vout"}`, `outputs` a JSON
    /// object mapping address to amount.
    create_raw_transaction => "createrawtransaction" (inputs: Value, outputs: Value) [];
    decode_raw_transaction => "decoderawtransaction" (hex: &str) [];
    sign_raw_transaction => "signrawtransaction" (hex: &str) [];
    send_raw_transaction => "sendrawtransaction" (hex: &str) [];

    // --- messages ------------------------------------------------------------

    sign_message => "signmessage" (address: &str, message: &str) [];
    verify_message => "verifymessage" (address: &str, signature: &str, message: &str) [];
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::super::mock::MockTransport;
    use super::*;
    use crate::endpoint::Network;

    fn client() -> RpcClient<MockTransport> {
        let transport = MockTransport::builder().build();
        RpcClient::with_transport("localhost", None, Network::Mainnet, transport)
    }

    fn queued(client: &RpcClient<MockTransport>) -> Vec<(String, Vec<Value>)> {
        client
            .pending()
            .iter()
            .map(|d| (d.method().to_owned(), d.params().to_vec()))
            .collect()
    }

    #[test]
    fn catalog_names_are_lowercase_and_unique() {
        let mut seen = HashSet::new();
        for spec in METHODS {
            assert_eq!(spec.rpc_name, spec.rpc_name.to_lowercase());
            assert!(seen.insert(spec.rpc_name), "duplicate entry {}", spec.rpc_name);
        }
        assert!(METHODS.len() >= 50);
    }

    #[test]
    fn required_params_precede_optional_ones() {
        for spec in METHODS {
            let required = spec.required();
            assert!(
                spec.params[..required].iter().all(|p| p.default.is_none()),
                "{} mixes optional params before required ones",
                spec.rpc_name
            );
        }
    }

    #[test]
    fn wrappers_queue_lowercased_names_in_order() {
        let mut client = client();
        client.get_info().get_block_count().get_block_hash(42);
        assert_eq!(
            queued(&client),
            vec![
                ("getinfo".to_owned(), vec![]),
                ("getblockcount".to_owned(), vec![]),
                ("getblockhash".to_owned(), vec![json!(42)]),
            ]
        );
    }

    #[test]
    fn wrappers_fill_defaults_for_none() {
        let mut client = client();
        client
            .get_balance(None, None)
            .wallet_passphrase("pw", Some(60), None)
            .list_transactions(Some("savings"), None, Some(10));
        assert_eq!(
            queued(&client),
            vec![
                ("getbalance".to_owned(), vec![json!(""), json!(6)]),
                ("walletpassphrase".to_owned(), vec![json!("pw"), json!(60), json!(true)]),
                (
                    "listtransactions".to_owned(),
                    vec![json!("savings"), json!(999), json!(10)]
                ),
            ]
        );
    }

    #[test]
    fn wrappers_pass_structured_args_through() {
        let mut client = client();
        client
            .send_many(json!({"PAddr1": 1.5}), None, Some("payroll"))
            .move_funds("a", "b", 0.25);
        assert_eq!(
            queued(&client),
            vec![
                (
                    "sendmany".to_owned(),
                    vec![json!({"PAddr1": 1.5}), json!(""), json!("payroll")]
                ),
                ("move".to_owned(), vec![json!("a"), json!("b"), json!(0.25)]),
            ]
        );
    }

    #[test]
    fn lookup_ignores_case() {
        let spec = lookup("ListUnspent").expect("listunspent must be in the catalog");
        assert_eq!(spec.rpc_name, "listunspent");
        assert!(lookup("nosuchmethod").is_none());
    }

    #[test]
    fn bind_appends_trailing_defaults() {
        let spec = lookup("listunspent").expect("listunspent must be in the catalog");
        assert_eq!(
            spec.bind(vec![]).expect("no args must bind"),
            vec![json!(1), json!(999_999)]
        );
        assert_eq!(
            spec.bind(vec![json!(6)]).expect("one arg must bind"),
            vec![json!(6), json!(999_999)]
        );
    }

    #[test]
    fn bind_rejects_missing_required_args() {
        let spec = lookup("sendtoaddress").expect("sendtoaddress must be in the catalog");
        let err = spec.bind(vec![json!("PAddr")]).expect_err("amount is required");
        assert!(matches!(
            err,
            CoreError::InvalidArguments { ref method, .. } if method == "sendtoaddress"
        ));
        assert!(err.to_string().contains("sendtoaddress <address> <amount> [comment=\"\"]"));
    }

    #[test]
    fn bind_rejects_surplus_args() {
        let spec = lookup("getblockcount").expect("getblockcount must be in the catalog");
        assert!(spec.bind(vec![json!(1)]).is_err());
    }

    #[test]
    fn usage_lists_params_and_defaults() {
        let spec = lookup("walletpassphrase").expect("walletpassphrase must be in the catalog");
        assert_eq!(
            spec.usage(),
            "walletpassphrase <passphrase> [timeout=99999999] [mint_only=true]"
        );
    }
}
