use std::process::exit;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use imgfs::{Bridge, FileStore, FileSystem, FileType, BLOCK_SIZE, DEFAULT_IMAGE_PATH};

fn path_arg() -> Arg<'static, 'static> {
    Arg::with_name("path")
        .required(true)
        .help("Slash-rooted path inside the image")
}

fn cli() -> App<'static, 'static> {
    App::new("imgfs")
        .about("Inspect and modify a single-file inode image")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("image")
                .short("i")
                .long("image")
                .takes_value(true)
                .default_value(DEFAULT_IMAGE_PATH)
                .help("Backing image file, formatted if empty"),
        )
        .subcommand(SubCommand::with_name("ls").about("List a directory").arg(path_arg()))
        .subcommand(SubCommand::with_name("stat").about("Show attributes").arg(path_arg()))
        .subcommand(SubCommand::with_name("mkdir").about("Create a directory").arg(path_arg()))
        .subcommand(SubCommand::with_name("rmdir").about("Remove an empty directory").arg(path_arg()))
        .subcommand(SubCommand::with_name("touch").about("Create an empty file").arg(path_arg()))
        .subcommand(SubCommand::with_name("rm").about("Remove a file").arg(path_arg()))
        .subcommand(SubCommand::with_name("cat").about("Print a file").arg(path_arg()))
        .subcommand(
            SubCommand::with_name("write")
                .about("Write text into a file")
                .arg(path_arg())
                .arg(Arg::with_name("text").required(true))
                .arg(
                    Arg::with_name("offset")
                        .short("o")
                        .long("offset")
                        .takes_value(true)
                        .default_value("0"),
                ),
        )
        .subcommand(SubCommand::with_name("dump").about("Summarize the image layout"))
}

fn run(bridge: &mut Bridge<FileStore>, cmd: &str, args: &ArgMatches) -> Result<(), i32> {
    let path = args.value_of("path").unwrap_or("/");
    match cmd {
        "ls" => {
            for name in bridge.readdir(path)? {
                println!("{}", name);
            }
        }
        "stat" => {
            let attr = bridge.getattr(path)?;
            let kind = match attr.kind {
                FileType::Directory => "directory",
                FileType::Regular => "file",
            };
            println!(
                "{} inode {} mode {:o} links {} size {} blocks {} mtime {}",
                kind, attr.ino, attr.mode, attr.nlink, attr.size, attr.blocks, attr.mtime
            );
        }
        "mkdir" => bridge.mkdir(path)?,
        "rmdir" => bridge.rmdir(path)?,
        "touch" => bridge.create(path)?,
        "rm" => bridge.unlink(path)?,
        "cat" => {
            bridge.open(path)?;
            let mut buf = vec![0u8; BLOCK_SIZE];
            let n = bridge.read(path, &mut buf, 0)?;
            print!("{}", String::from_utf8_lossy(&buf[..n]));
        }
        "write" => {
            let offset = args
                .value_of("offset")
                .unwrap_or("0")
                .parse::<usize>()
                .map_err(|_| -libc::EINVAL)?;
            let text = args.value_of("text").unwrap_or_default();
            bridge.open(path)?;
            let n = bridge.write(path, text.as_bytes(), offset)?;
            println!("{} bytes written", n);
        }
        "dump" => println!("{}", bridge.fs().dump()),
        _ => return Err(-libc::EINVAL),
    }
    Ok(())
}

fn main() {
    imgfs::logging::init();
    let matches = cli().get_matches();
    let image = matches.value_of("image").unwrap_or(DEFAULT_IMAGE_PATH);

    let fs = match FileStore::open(image).and_then(FileSystem::open) {
        Ok(fs) => fs,
        Err(e) => {
            eprintln!("imgfs: cannot open {}: {}", image, e);
            exit(1);
        }
    };
    let mut bridge = Bridge::new(fs);

    let (cmd, args) = matches.subcommand();
    let args = match args {
        Some(args) => args,
        None => exit(2),
    };
    if let Err(errno) = run(&mut bridge, cmd, args) {
        eprintln!("imgfs {}: {}", cmd, std::io::Error::from_raw_os_error(-errno));
        exit(1);
    }
}
