mod cli;
mod config;

use std::fs;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result, bail, ensure};
use cli::{CheckTablesCommand, Cli, Command, CutAndChooseCommand, GarbleCommand, VerifyCommand};
use indicatif::ProgressBar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use seedgc_garble::seed::TABLE_LEN;
use seedgc_garble::{
    BooleanCircuit, CutAndChooseError, CutAndChooseGarbler, CutAndChooseVerifier,
    GarbledBooleanCircuit, GarbledTables, GarblingConfig, audit, ripple_carry_adder,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse_args();
    let config = config::load(&args.algorithms)?;
    let circuit = ripple_carry_adder(args.bits).context("building adder circuit")?;
    info!(
        bits = args.bits,
        gates = circuit.num_gates(),
        prg = %config.prg,
        prf = %config.prf,
        hash = %config.hash,
        "built adder circuit"
    );

    match args.command {
        Command::Garble(cmd) => run_garble(&config, &circuit, cmd),
        Command::Verify(cmd) => run_verify(&config, &circuit, cmd),
        Command::CheckTables(cmd) => run_check_tables(&config, &circuit, cmd),
        Command::CutAndChoose(cmd) => run_cut_and_choose(&config, &circuit, cmd),
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner().with_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn decode_hex(what: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value).with_context(|| format!("{what} is not valid hex"))
}

fn decode_seed(config: &GarblingConfig, value: &str) -> Result<Vec<u8>> {
    let seed = decode_hex("seed", value)?;
    ensure!(
        seed.len() == config.seed_len(),
        "{} expects a {}-byte seed, got {} bytes",
        config.prg,
        config.seed_len(),
        seed.len()
    );
    Ok(seed)
}

fn verdict(accepted: bool) -> ExitCode {
    if accepted {
        println!("accepted");
        ExitCode::SUCCESS
    } else {
        println!("rejected");
        ExitCode::FAILURE
    }
}

fn run_garble(config: &GarblingConfig, circuit: &BooleanCircuit, cmd: GarbleCommand) -> Result<ExitCode> {
    let seed = match cmd.seed {
        Some(hex_seed) => decode_seed(config, &hex_seed)?,
        None => {
            let mut seed = vec![0u8; config.seed_len()];
            rand::rng().fill(&mut seed[..]);
            seed
        }
    };

    let pb = spinner("garbling");
    let mut garbled = GarbledBooleanCircuit::new(circuit);
    let values = garbled.garble(
        &config.garbler(),
        circuit,
        &mut config.build_prg(),
        &seed,
        &mut config.build_hash(),
    )?;
    pb.finish_and_clear();

    println!("gates: {}", circuit.num_gates());
    println!("seed: {}", hex::encode(&seed));
    println!("digest: {}", hex::encode(&values.digest));

    if let Some(path) = cmd.tables {
        let bytes: Vec<u8> = garbled.garbled_tables().present().flatten().copied().collect();
        fs::write(&path, &bytes).with_context(|| format!("writing {}", path.display()))?;
        println!("tables: {} ({} bytes)", path.display(), bytes.len());
    }
    Ok(ExitCode::SUCCESS)
}

fn run_verify(config: &GarblingConfig, circuit: &BooleanCircuit, cmd: VerifyCommand) -> Result<ExitCode> {
    let seed = decode_seed(config, &cmd.seed)?;
    let digest = decode_hex("digest", &cmd.digest)?;

    let pb = spinner("regenerating");
    let accepted = audit::verify(
        &config.garbler(),
        circuit,
        &mut config.build_prg(),
        &seed,
        &mut config.build_hash(),
        &digest,
    )?;
    pb.finish_and_clear();

    Ok(verdict(accepted))
}

fn run_check_tables(
    config: &GarblingConfig,
    circuit: &BooleanCircuit,
    cmd: CheckTablesCommand,
) -> Result<ExitCode> {
    let digest = decode_hex("digest", &cmd.digest)?;
    let bytes = fs::read(&cmd.tables).with_context(|| format!("reading {}", cmd.tables.display()))?;

    let expected = circuit.num_gates() * TABLE_LEN;
    if bytes.len() != expected {
        bail!(
            "{} holds {} bytes, expected {} for {} gates",
            cmd.tables.display(),
            bytes.len(),
            expected,
            circuit.num_gates()
        );
    }
    let tables = GarbledTables::from_tables(bytes.chunks(TABLE_LEN).map(<[u8]>::to_vec).collect());

    let accepted = audit::verify_garbled_tables(&tables, &mut config.build_hash(), &digest);
    Ok(verdict(accepted))
}

fn run_cut_and_choose(
    config: &GarblingConfig,
    circuit: &BooleanCircuit,
    cmd: CutAndChooseCommand,
) -> Result<ExitCode> {
    let (mut garbler_rng, mut verifier_rng) = match cmd.rng_seed {
        Some(seed) => (StdRng::seed_from_u64(seed), StdRng::seed_from_u64(seed.wrapping_add(1))),
        None => (StdRng::from_os_rng(), StdRng::from_os_rng()),
    };

    let mut garbler = CutAndChooseGarbler::new(*config, circuit.clone());
    let verifier = CutAndChooseVerifier::new(*config, circuit.clone());

    let pb = spinner("committing");
    let commitments = garbler.commit(&mut garbler_rng, cmd.circuits)?;
    pb.finish_and_clear();
    println!("committed: {}", commitments.len());

    let checks = verifier.choose(&mut verifier_rng, commitments.len(), cmd.checks)?;
    println!(
        "checks: {}",
        checks.iter().map(usize::to_string).collect::<Vec<_>>().join(",")
    );

    let opening = garbler.open(&checks)?;
    let pb = spinner("auditing");
    let result = verifier.audit(&commitments, &checks, opening);
    pb.finish_and_clear();

    match result {
        Ok(evaluated) => {
            println!("evaluation circuits: {}", evaluated.len());
            println!("audit passed");
            Ok(ExitCode::SUCCESS)
        }
        Err(CutAndChooseError::CheatAttempt { index }) => {
            println!("cheating detected in circuit {index}");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    // Used by the integration tests only.
    use assert_cmd as _;
    use predicates as _;
}
