/// User-supplied pointer to the contract text to audit
#[derive(Debug, Clone)]
pub enum SourceSelector {
    /// Name of a built-in example contract
    Example(String),
    /// Literal contract source (pasted, read from a file, or piped in)
    Literal(String),
}

/// Maps a selector to literal contract text
pub trait SourceResolver {
    fn resolve(&self, selector: &SourceSelector) -> anyhow::Result<String>;
}

/// Resolver backed by the built-in example table
pub struct ExampleResolver;

impl SourceResolver for ExampleResolver {
    fn resolve(&self, selector: &SourceSelector) -> anyhow::Result<String> {
        match selector {
            SourceSelector::Example(name) => example_contract(name)
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("unknown example contract: {}", name)),
            SourceSelector::Literal(text) => Ok(text.clone()),
        }
    }
}

/// Look up a built-in example contract by name
pub fn example_contract(name: &str) -> Option<&'static str> {
    EXAMPLE_CONTRACTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, text)| *text)
}

/// Built-in demo contracts, each exhibiting a classic vulnerability
pub const EXAMPLE_CONTRACTS: &[(&str, &str)] = &[
    (
        "reentrancy",
        r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.0;

contract EtherStore {
    mapping(address => uint) public balances;

    function deposit() public payable {
        balances[msg.sender] += msg.value;
    }

    function withdraw() public {
        uint bal = balances[msg.sender];
        require(bal > 0);

        (bool sent, ) = msg.sender.call{value: bal}("");
        require(sent, "Failed to send Ether");

        balances[msg.sender] = 0;
    }
}"#,
    ),
    (
        "overflow",
        r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.0;

contract TimeLock {
    mapping(address => uint) public balances;
    mapping(address => uint) public lockTime;

    function deposit() external payable {
        balances[msg.sender] += msg.value;
        lockTime[msg.sender] = block.timestamp + 1 weeks;
    }

    function increaseLockTime(uint _secondsToIncrease) public {
        lockTime[msg.sender] += _secondsToIncrease;
    }

    function withdraw() public {
        require(balances[msg.sender] > 0, "Insufficient balance");
        require(block.timestamp > lockTime[msg.sender], "Lock time not expired");

        uint amount = balances[msg.sender];
        balances[msg.sender] = 0;

        (bool sent, ) = msg.sender.call{value: amount}("");
        require(sent, "Failed to send Ether");
    }
}"#,
    ),
];
