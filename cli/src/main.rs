mod proposal;

use std::{convert::TryFrom, process::exit, sync::Arc};

use clap::{
    crate_description, crate_name, crate_version, value_t, value_t_or_exit, App, AppSettings,
    Arg, ArgMatches, SubCommand,
};
use everlend_strategies::{
    apy::{EverlendApi, EVERLEND_API_URL},
    governance::{AssetAccount, GovernanceAccount, GovernanceConfig, ValidatedTreasury},
    list_strategies,
    pool::{PoolProvider, RpcPoolProvider},
    submit_everlend_action,
    token::TokenList,
    Action, ActionForm, Network, ProposalContext,
};
use proposal::DryRunProposalCreator;
use solana_clap_utils::{
    input_parsers::pubkey_of,
    input_validators::{is_pubkey, is_url_or_moniker, normalize_to_url_if_moniker},
};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_program::{pubkey, pubkey::Pubkey};
use solana_sdk::commitment_config::CommitmentConfig;

/// spl-governance program deployed on mainnet and devnet
const GOVERNANCE_PROGRAM_ID: Pubkey = pubkey!("GovER5Lthms3bLBqWub97yVrMmEogzX7xNjdXpPPCVZw");

struct Config {
    rpc_client: Arc<RpcClient>,
    network: Network,
    verbose: bool,
    tokens: TokenList,
    api: EverlendApi,
}

type Error = Box<dyn std::error::Error>;
type CommandResult = Result<(), Error>;

/// Cluster name the network table is keyed by
fn cluster_of(json_rpc_url: &str) -> &'static str {
    if json_rpc_url.contains("mainnet") {
        "mainnet"
    } else if json_rpc_url.contains("devnet") {
        "devnet"
    } else {
        "localnet"
    }
}

async fn command_strategies(config: &Config) -> CommandResult {
    let pools = RpcPoolProvider::new(config.rpc_client.clone());
    let strategies =
        list_strategies(config.network, &pools, &config.api, &config.tokens).await?;

    if config.verbose {
        println!("Strategies: {}", strategies.len());
    }
    println!("{}", serde_json::to_string_pretty(&strategies)?);

    Ok(())
}

async fn command_propose(config: &Config, arg_matches: &ArgMatches<'_>) -> CommandResult {
    let action = match value_t_or_exit!(arg_matches, "action", String).as_str() {
        "deposit" => Action::Deposit,
        "withdraw" => Action::Withdraw,
        _ => unreachable!(),
    };
    let amount = value_t_or_exit!(arg_matches, "amount", u64);
    let pool_pubkey = pubkey_of(arg_matches, "pool").unwrap();
    let is_sol = arg_matches.is_present("sol");

    let treasury = AssetAccount {
        pubkey: pubkey_of(arg_matches, "treasury").unwrap(),
        is_sol,
        governance: Some(GovernanceAccount {
            pubkey: pubkey_of(arg_matches, "governance").unwrap(),
            config: Some(GovernanceConfig {
                min_instruction_hold_up_time: value_t_or_exit!(
                    arg_matches,
                    "hold_up_time",
                    u32
                ),
            }),
        }),
        token_account_owner: pubkey_of(arg_matches, "token_owner"),
    };
    let treasury = ValidatedTreasury::try_from(&treasury)?;

    // Form mints are read from the pool
    let pools = RpcPoolProvider::new(config.rpc_client.clone());
    let pool = pools.get_pool(&pool_pubkey).await?;

    let form = ActionForm {
        action,
        title: value_t_or_exit!(arg_matches, "title", String),
        description: value_t!(arg_matches, "description", String).unwrap_or_default(),
        amount,
        pool_pub_key: pool.pubkey,
        token_mint: pool.data.token_mint,
        pool_mint: pool.data.pool_mint,
    };

    let context = ProposalContext {
        realm: pubkey_of(arg_matches, "realm").unwrap(),
        token_owner_record: pubkey_of(arg_matches, "token_owner_record").unwrap(),
        governing_token_mint: pubkey_of(arg_matches, "governing_mint").unwrap(),
        proposal_index: value_t_or_exit!(arg_matches, "proposal_index", u32),
        is_draft: arg_matches.is_present("draft"),
        voter_weight_record: pubkey_of(arg_matches, "voter_weight_record"),
    };

    let proposals = DryRunProposalCreator {
        governance_program: pubkey_of(arg_matches, "governance_program")
            .unwrap_or(GOVERNANCE_PROGRAM_ID),
    };

    let proposal =
        submit_everlend_action(config.network, &form, &treasury, &pool, &context, &proposals)
            .await?;
    if config.verbose {
        println!("{:?} {} for pool {}", form.action, amount, pool.pubkey);
    }
    println!("Proposal address: {}", proposal);

    Ok(())
}

fn pubkey_arg<'a, 'b>(name: &'a str, long: &'a str, help: &'a str) -> Arg<'a, 'b> {
    Arg::with_name(name)
        .long(long)
        .validator(is_pubkey)
        .value_name("ADDRESS")
        .takes_value(true)
        .help(help)
}

#[tokio::main]
async fn main() {
    let matches = App::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg({
            let arg = Arg::with_name("config_file")
                .short("C")
                .long("config")
                .value_name("PATH")
                .takes_value(true)
                .global(true)
                .help("Configuration file to use");
            if let Some(ref config_file) = *solana_cli_config::CONFIG_FILE {
                arg.default_value(config_file)
            } else {
                arg
            }
        })
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .takes_value(false)
                .global(true)
                .help("Show additional information"),
        )
        .arg(
            Arg::with_name("json_rpc_url")
                .short("u")
                .long("url")
                .value_name("URL_OR_MONIKER")
                .takes_value(true)
                .global(true)
                .validator(is_url_or_moniker)
                .help(
                    "URL for Solana's JSON RPC or moniker (or their first letter): \
                       [mainnet-beta, testnet, devnet, localhost] \
                    Default from the configuration file.",
                ),
        )
        .arg(
            Arg::with_name("cluster")
                .long("cluster")
                .value_name("CLUSTER")
                .takes_value(true)
                .global(true)
                .help(
                    "Cluster to resolve Everlend addresses for. \
                     Only `mainnet` selects mainnet addresses. \
                     Default inferred from the RPC url.",
                ),
        )
        .arg(
            Arg::with_name("token_list")
                .long("token-list")
                .value_name("PATH")
                .takes_value(true)
                .global(true)
                .help("Solana token-list JSON used for token symbols and logos"),
        )
        .arg(
            Arg::with_name("apy_endpoint")
                .long("apy-endpoint")
                .value_name("URL")
                .takes_value(true)
                .global(true)
                .default_value(EVERLEND_API_URL)
                .help("Everlend API base url"),
        )
        .subcommand(SubCommand::with_name("strategies").about("List Everlend deposit strategies"))
        .subcommand(
            SubCommand::with_name("propose")
                .about("Build a deposit or withdrawal proposal (dry run)")
                .arg(
                    Arg::with_name("action")
                        .long("action")
                        .value_name("ACTION")
                        .takes_value(true)
                        .required(true)
                        .possible_values(&["deposit", "withdraw"])
                        .help("Pool action"),
                )
                .arg(
                    Arg::with_name("amount")
                        .long("amount")
                        .value_name("AMOUNT")
                        .takes_value(true)
                        .required(true)
                        .help("Amount in base units"),
                )
                .arg(pubkey_arg("pool", "pool", "Pool pubkey").required(true))
                .arg(
                    Arg::with_name("title")
                        .long("title")
                        .value_name("TITLE")
                        .takes_value(true)
                        .required(true)
                        .help("Proposal title"),
                )
                .arg(
                    Arg::with_name("description")
                        .long("description")
                        .value_name("TEXT")
                        .takes_value(true)
                        .help("Proposal description"),
                )
                .arg(pubkey_arg("treasury", "treasury", "Treasury account").required(true))
                .arg(
                    Arg::with_name("sol")
                        .long("sol")
                        .takes_value(false)
                        .help("Treasury holds native SOL"),
                )
                .arg(pubkey_arg(
                    "token_owner",
                    "token-owner",
                    "Owner of the treasury token account",
                ))
                .arg(pubkey_arg("governance", "governance", "Treasury governance").required(true))
                .arg(
                    Arg::with_name("hold_up_time")
                        .long("hold-up-time")
                        .value_name("SECONDS")
                        .takes_value(true)
                        .default_value("0")
                        .help("Governance minimum instruction hold up time"),
                )
                .arg(pubkey_arg("realm", "realm", "Realm").required(true))
                .arg(
                    pubkey_arg(
                        "token_owner_record",
                        "token-owner-record",
                        "Proposer's token owner record",
                    )
                    .required(true),
                )
                .arg(
                    pubkey_arg("governing_mint", "governing-mint", "Governing token mint")
                        .required(true),
                )
                .arg(
                    Arg::with_name("proposal_index")
                        .long("proposal-index")
                        .value_name("INDEX")
                        .takes_value(true)
                        .default_value("0")
                        .help("Index of the new proposal"),
                )
                .arg(
                    Arg::with_name("draft")
                        .long("draft")
                        .takes_value(false)
                        .help("Leave the proposal in draft"),
                )
                .arg(pubkey_arg(
                    "voter_weight_record",
                    "voter-weight-record",
                    "Voter weight record of a voting plugin",
                ))
                .arg(pubkey_arg(
                    "governance_program",
                    "governance-program",
                    "spl-governance program id [default: GovER5Lthms3bLBqWub97yVrMmEogzX7xNjdXpPPCVZw]",
                )),
        )
        .get_matches();

    solana_logger::setup_with_default("solana=info");

    let config = {
        let cli_config = if let Some(config_file) = matches.value_of("config_file") {
            solana_cli_config::Config::load(config_file).unwrap_or_default()
        } else {
            solana_cli_config::Config::default()
        };

        let json_rpc_url = normalize_to_url_if_moniker(
            value_t!(matches, "json_rpc_url", String)
                .unwrap_or_else(|_| cli_config.json_rpc_url.clone()),
        );

        let network = Network::from_cluster(
            matches
                .value_of("cluster")
                .unwrap_or_else(|| cluster_of(&json_rpc_url)),
        );

        let tokens = match matches.value_of("token_list") {
            Some(path) => TokenList::load(path).unwrap_or_else(|e| {
                eprintln!("error: {}", e);
                exit(1);
            }),
            None => TokenList::default(),
        };

        let api = EverlendApi::new(matches.value_of("apy_endpoint").unwrap_or(EVERLEND_API_URL))
            .unwrap_or_else(|e| {
                eprintln!("error: {}", e);
                exit(1);
            });

        Config {
            rpc_client: Arc::new(RpcClient::new_with_commitment(
                json_rpc_url,
                CommitmentConfig::confirmed(),
            )),
            network,
            verbose: matches.is_present("verbose"),
            tokens,
            api,
        }
    };

    let result = match matches.subcommand() {
        ("strategies", Some(_)) => command_strategies(&config).await,
        ("propose", Some(arg_matches)) => command_propose(&config, arg_matches).await,
        _ => unreachable!(),
    };

    if let Err(err) = result {
        eprintln!("{}", err);
        exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_from_url() {
        assert_eq!(cluster_of("https://api.mainnet-beta.solana.com"), "mainnet");
        assert_eq!(cluster_of("https://api.devnet.solana.com"), "devnet");
        assert_eq!(cluster_of("http://localhost:8899"), "localnet");
        assert_eq!(Network::from_cluster(cluster_of("http://localhost:8899")), Network::Dev);
    }
}
