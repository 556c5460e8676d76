use anyhow::anyhow;
use clap::Parser;
use rs_clr::host::{ClrHost, HostLoadState};
use rs_clr::native_string::NativeString;
use rs_clr::registry::{MethodRegistry, MethodSignature};
use std::ffi::CString;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing the managed build output. Defaults to the
    /// "managed" directory next to this executable.
    #[arg(short, long)]
    managed_dir: Option<PathBuf>,
    /// Name of the managed assembly. "{name}.runtimeconfig.json",
    /// "{name}.dll" and the type "{name}.ManagedApi, {name}" are derived
    /// from it.
    #[arg(long, default_value = "ManagedLib")]
    host_name: String,
}

/// Exported for the managed side, which can import it back from the running
/// host by name.
#[no_mangle]
pub extern "C" fn native_host_ping() {
    log::info!("native_host_ping called from managed code");
}

extern "C" fn primitive_callback(value: bool) {
    log::info!("bool from managed code: {}", value);
}

extern "C" fn struct_callback(data: NativeString) {
    match unsafe { data.as_cstr() } {
        Some(text) => log::info!("string from managed code: {}", text.to_string_lossy()),
        None => log::warn!("managed code sent a null string"),
    }
}

fn main_program_handle() -> anyhow::Result<*mut libc::c_void> {
    #[cfg(unix)]
    {
        Ok(libloading::os::unix::Library::this().into_raw() as *mut libc::c_void)
    }
    #[cfg(windows)]
    {
        let library =
            libloading::os::windows::Library::this().map_err(|err| anyhow!("{}", err))?;
        Ok(library.into_raw() as *mut libc::c_void)
    }
}

fn call_main(host: &mut ClrHost, registry: &MethodRegistry, type_name: &str) -> anyhow::Result<()> {
    let method = registry
        .resolve(host, type_name, "Main")?
        .into_entry_point()?;
    let handle = main_program_handle()?;
    unsafe { method(handle) };
    Ok(())
}

fn call_print(
    host: &mut ClrHost,
    registry: &MethodRegistry,
    type_name: &str,
) -> anyhow::Result<()> {
    let method = registry
        .resolve(host, type_name, "Print")?
        .into_takes_string()?;
    let message = CString::new("Test")?;
    // The buffer outlives the call; the managed side reads it in place.
    unsafe { method(NativeString::from_cstr(message.as_c_str())) };
    Ok(())
}

fn call_print_and_return(
    host: &mut ClrHost,
    registry: &MethodRegistry,
    type_name: &str,
) -> anyhow::Result<()> {
    let method = registry
        .resolve(host, type_name, "PrintAndReturn")?
        .into_string_to_string()?;
    let message = CString::new("Test")?;
    let returned = unsafe { method(NativeString::from_cstr(message.as_c_str())) };
    match unsafe { returned.as_cstr() } {
        Some(text) => log::info!("returned from managed code: {}", text.to_string_lossy()),
        None => log::warn!("managed code returned a null string"),
    }
    Ok(())
}

fn call_do_stuff(
    host: &mut ClrHost,
    registry: &MethodRegistry,
    type_name: &str,
) -> anyhow::Result<()> {
    let method = registry
        .resolve(host, type_name, "DoStuff")?
        .into_takes_bool_callback()?;
    unsafe { method(primitive_callback) };
    Ok(())
}

fn call_do_stuff_struct(
    host: &mut ClrHost,
    registry: &MethodRegistry,
    type_name: &str,
) -> anyhow::Result<()> {
    let method = registry
        .resolve(host, type_name, "DoStuffStruct")?
        .into_takes_string_callback()?;
    unsafe { method(struct_callback) };
    Ok(())
}

fn default_managed_dir() -> anyhow::Result<PathBuf> {
    let exe_path = std::env::current_exe()?;
    let host_dir = exe_path
        .parent()
        .ok_or(anyhow!("executable has no parent directory"))?;
    Ok(host_dir.join("managed"))
}

fn main() -> anyhow::Result<()> {
    let log_env = env_logger::Env::default().default_filter_or("rs_clr,rs_clr_host");
    env_logger::Builder::from_env(log_env).init();

    let cli = Cli::parse();
    let managed_dir = match cli.managed_dir.clone() {
        Some(dir) => dir,
        None => default_managed_dir()?,
    };
    let config_path = managed_dir.join(format!("{}.runtimeconfig.json", &cli.host_name));
    let assembly_path = managed_dir.join(format!("{}.dll", &cli.host_name));
    let type_name = format!("{0}.ManagedApi, {0}", &cli.host_name);

    let mut host = ClrHost::new();
    match host.create(&config_path, &assembly_path) {
        Ok(HostLoadState::Initialized) => {
            log::info!("runtime started from {:?}", config_path);
        }
        Ok(HostLoadState::AlreadyInitialized) => {
            log::info!("runtime was already initialized, reusing it");
        }
        Err(err) => {
            log::error!("runtime bootstrap failed: {} (last status {:#x})", err, host.last_status());
            return Err(err.into());
        }
    }

    let mut registry = MethodRegistry::new();
    registry.declare(&type_name, "Main", MethodSignature::EntryPoint);
    registry.declare(&type_name, "Print", MethodSignature::TakesString);
    registry.declare(&type_name, "PrintAndReturn", MethodSignature::StringToString);
    registry.declare(&type_name, "DoStuff", MethodSignature::TakesBoolCallback);
    registry.declare(
        &type_name,
        "DoStuffStruct",
        MethodSignature::TakesStringCallback,
    );

    call_main(&mut host, &registry, &type_name)?;
    call_print(&mut host, &registry, &type_name)?;
    call_print_and_return(&mut host, &registry, &type_name)?;
    call_do_stuff(&mut host, &registry, &type_name)?;
    call_do_stuff_struct(&mut host, &registry, &type_name)?;
    Ok(())
}
