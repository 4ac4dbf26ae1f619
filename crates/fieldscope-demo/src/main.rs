// Fieldscope demo CLI
// Describes, reads, validates and serializes a handful of sample types

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fieldscope::{
    field_handle, list_capabilities, supports_capability, FieldscopeConfig, Introspect, Serializer,
    TypeDescriptor, TypeRegistry, Validator,
};
use tracing_subscriber::EnvFilter;

mod models;

use models::{Animal, Desk, JsonModel, Parrot};

#[derive(Parser)]
#[command(name = "fieldscope-demo")]
#[command(about = "Runtime introspection demo", version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the serializer depth limit (0 disables it)
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print type descriptors
    Describe {
        /// Type to describe; all sample types when omitted
        type_name: Option<String>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Read one field of a sample instance
    Read {
        type_name: String,
        field: String,

        /// Lift the visibility check for this read
        #[arg(long)]
        privileged: bool,
    },

    /// Validate sample objects, valid and invalid
    Validate,

    /// Serialize sample objects
    Serialize,

    /// Show capability tags and inheritance checks
    Capabilities,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => FieldscopeConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => FieldscopeConfig::default(),
    };
    if let Some(max_depth) = cli.max_depth {
        config.serializer.max_depth = max_depth;
    }
    tracing::debug!(?config, "configuration resolved");

    match cli.command {
        Some(Commands::Describe { type_name, json }) => describe(type_name.as_deref(), json)?,
        Some(Commands::Read {
            type_name,
            field,
            privileged,
        }) => read(&type_name, &field, privileged)?,
        Some(Commands::Validate) => validate_samples(&config),
        Some(Commands::Serialize) => serialize_samples(&config)?,
        Some(Commands::Capabilities) => show_capabilities(),
        None => {
            describe(None, false)?;
            validate_samples(&config);
            serialize_samples(&config)?;
            show_capabilities();
            read_hidden_field()?;
        }
    }

    Ok(())
}

fn sample_or_bail(type_name: &str) -> Result<Box<dyn Introspect>> {
    match models::sample(type_name) {
        Some(value) => Ok(value),
        None => bail!(
            "unknown type `{}` (expected one of: {})",
            type_name,
            models::TYPE_NAMES.join(", ")
        ),
    }
}

fn describe(type_name: Option<&str>, json: bool) -> Result<()> {
    let names: Vec<&str> = match type_name {
        Some(name) => vec![name],
        None => models::TYPE_NAMES.to_vec(),
    };

    let mut descriptors = Vec::with_capacity(names.len());
    for name in names {
        let sample = sample_or_bail(name)?;
        descriptors.push(fieldscope::describe_type(&*sample));
    }

    if json {
        let docs: Vec<&TypeDescriptor> = descriptors.iter().map(|d| &**d).collect();
        println!("{}", serde_json::to_string_pretty(&docs)?);
        return Ok(());
    }

    println!("=== Type Descriptors ===\n");
    for descriptor in &descriptors {
        print_descriptor(descriptor);
    }
    println!(
        "Registry holds {} type(s): {}\n",
        TypeRegistry::global().len(),
        TypeRegistry::global().type_paths().join(", ")
    );
    Ok(())
}

fn print_descriptor(descriptor: &TypeDescriptor) {
    match descriptor.parent_name() {
        Some(parent) => println!("{} (extends {})", descriptor.type_name(), parent),
        None => println!("{}", descriptor.type_name()),
    }

    let tags = list_capabilities(descriptor);
    if !tags.is_empty() {
        let tags: Vec<_> = tags.into_iter().collect();
        println!("  capabilities: {}", tags.join(", "));
    }

    for field in descriptor.fields() {
        let constraint = field
            .constraint
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        let origin = if field.declared_in == descriptor.type_name() {
            String::new()
        } else {
            format!("  (from {})", field.declared_in)
        };
        println!(
            "  {:<12} {:<10} {:<8} {:<12}{}",
            field.name,
            field.kind,
            if field.visible { "visible" } else { "hidden" },
            constraint,
            origin
        );
    }
    println!();
}

fn read(type_name: &str, field: &str, privileged: bool) -> Result<()> {
    let sample = sample_or_bail(type_name)?;
    let handle = field_handle(&*sample, field)?;
    if privileged {
        handle.grant_privileged_access();
    }

    let value = handle.read(&*sample)?;
    let rendered = Serializer::new().serialize_value(&value)?;
    println!("{}.{} = {}", type_name, field, rendered);
    Ok(())
}

/// The hidden `can_talk` flag: refused first, then read after the grant
fn read_hidden_field() -> Result<()> {
    println!("=== Field Access ===\n");

    let parrot = models::sample_parrot();
    let handle = field_handle(&parrot, "can_talk")?;

    match handle.read(&parrot) {
        Ok(value) => println!("Unexpectedly readable: {:?}", value),
        Err(e) => println!("❌ {}", e),
    }

    handle.grant_privileged_access();
    let value = handle.read(&parrot)?;
    println!("✅ Parrot.can_talk = {}\n", Serializer::new().serialize_value(&value)?);
    Ok(())
}

fn validate_samples(config: &FieldscopeConfig) {
    println!("=== Validation ===\n");
    let validator = Validator::new().with_config(config.validator.clone());

    let mut too_fast = models::sample_parrot();
    too_fast.set_fly_speed(200);

    let mut model = models::sample_model();
    model.desks.push(Desk::new(-5));

    let cases: [(&str, &dyn Introspect); 6] = [
        ("desk at height 75", &Desk::new(75)),
        ("desk at height -10", &Desk::new(-10)),
        ("parrot within range", &models::sample_parrot()),
        ("parrot flying at 200", &too_fast),
        ("animal with negative age", &Animal { age: -3 }),
        ("model with a broken desk", &model),
    ];

    for (label, value) in cases {
        report(label, &validator, value);
    }
}

fn report(label: &str, validator: &Validator<'_>, value: &dyn Introspect) {
    match validator.check(value) {
        Ok(()) => println!("✅ {}: valid", label),
        Err(failure) => {
            println!("❌ {}: {}", label, failure);
            for violation in &failure.violations {
                println!("   - {}", violation);
            }
        }
    }
}

fn serialize_samples(config: &FieldscopeConfig) -> Result<()> {
    println!("=== Serialization ===\n");
    let serializer = Serializer::new().with_config(config.serializer.clone());

    println!("Animal:    {}", serializer.serialize(&Animal { age: 3 })?);
    println!("Parrot:    {}", serializer.serialize(&models::sample_parrot())?);
    println!("Desk:      {}", serializer.serialize(&Desk::new(75))?);

    // The model nests three levels deep, so a tight limit fails here
    match serializer.serialize(&models::sample_model()) {
        Ok(text) => println!("JsonModel: {}\n", text),
        Err(e) => println!("JsonModel: ❌ {}\n", e),
    }
    Ok(())
}

fn show_capabilities() {
    println!("=== Capabilities ===\n");

    let samples: [&dyn Introspect; 4] = [
        &Animal::default(),
        &Parrot::default(),
        &Desk::default(),
        &JsonModel::default(),
    ];

    for sample in samples {
        let descriptor = fieldscope::describe_type(sample);
        for tag in models::INTERESTING_TAGS {
            let verdict = if supports_capability(&descriptor, tag) { "yes" } else { "no" };
            println!("{:<10} supports {:<20} {}", descriptor.type_name(), tag, verdict);
        }
    }

    let parrot = fieldscope::describe_type(&Parrot::default());
    println!(
        "\nParrot is an Animal: {}, Parrot is a Desk: {}\n",
        parrot.is_a("Animal"),
        parrot.is_a("Desk")
    );
}
