use anyhow::{bail, Context, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use clap::Parser;
use crossterm::style::Stylize;
use inquire::Confirm;
use mach_header::consts::{FAT_CIGAM, FAT_MAGIC, MH_CIGAM, MH_CIGAM_64, MH_MAGIC, MH_MAGIC_64};
use mach_header::{execute_header, ByteOrder, FatArch, FatHeader, MachHeader64};
use std::{
    fs::{metadata, File},
    io::{Read, Seek, SeekFrom},
    path::Path,
    process::exit,
};

#[derive(Parser, Debug)]
#[command(about = "Print the 64-bit Mach-O header of a file or of this process")]
struct Args {
    /// Mach-O file to inspect; the running executable when omitted
    input_file: Option<String>,
    /// Dump every slice of a fat file
    #[arg(long, short)]
    all: bool,
    /// Run without asking for confirmation
    #[arg(long, short('y'))]
    all_yes: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let Some(input_file) = &args.input_file else {
        let header = execute_header().context("no _mh_execute_header on this platform")?;
        println!("match {} header", "_mh_execute_header".red());
        print_header(header, ByteOrder::NATIVE);
        return Ok(());
    };

    if !Path::new(input_file).exists() {
        bail!("Input file does not exist");
    }
    if !metadata(input_file)?.is_file() {
        bail!("Input file is not a file");
    }

    let mut file = File::open(input_file).with_context(|| format!("opening `{}`", input_file))?;
    args.inspect(&mut file)?;

    println!("{}", "Done!".green().bold());
    Ok(())
}

fn read_at<R: Read + Seek>(file: &mut R, offset: u64, len: usize) -> Result<Vec<u8>> {
    file.seek(SeekFrom::Start(offset))?;
    let mut buf = vec![0; len];
    file.read_exact(&mut buf)
        .with_context(|| format!("reading {} bytes at {:#x}", len, offset))?;
    Ok(buf)
}

fn print_header(header: &MachHeader64, order: ByteOrder) {
    let label = |s: &str| format!("{:>12}", s).cyan();

    println!("{} {:#010x} ({:?} endian)", label("magic"), header.magic, order);
    println!(
        "{} {:#x} {}",
        label("cputype"),
        header.cputype,
        header.cpu_name().unwrap_or("?").red()
    );
    println!("{} {:#x}", label("cpusubtype"), header.cpusubtype);
    println!(
        "{} {:#x} {}",
        label("filetype"),
        header.filetype,
        header.filetype_name().unwrap_or("?").red()
    );
    println!("{} {}", label("ncmds"), header.ncmds);
    println!("{} {:#x}", label("sizeofcmds"), header.sizeofcmds);
    println!(
        "{} {:#010x} {}",
        label("flags"),
        header.flags,
        header.flag_names().join("|")
    );
    println!("{} {:#x}", label("reserved"), header.reserved);
}

/// Headers printed by one run, in file order.
type Dumped = Vec<(MachHeader64, ByteOrder)>;

trait Utils {
    fn ask_for_confirmation(&self, msg: &str) -> Result<bool>;
    fn inspect<R: Read + Seek>(&self, file: &mut R) -> Result<Dumped>;
    fn dump_slice<R: Read + Seek>(
        &self,
        file: &mut R,
        global_offset: u64,
    ) -> Result<(MachHeader64, ByteOrder)>;
    fn handle_fat<R: Read + Seek>(&self, file: &mut R, order: ByteOrder) -> Result<Dumped>;
}

impl Utils for Args {
    fn ask_for_confirmation(&self, msg: &str) -> Result<bool> {
        if self.all_yes || self.all {
            return Ok(true);
        }

        Ok(Confirm::new(msg).with_default(true).prompt()?)
    }

    fn inspect<R: Read + Seek>(&self, file: &mut R) -> Result<Dumped> {
        file.seek(SeekFrom::Start(0))?;
        let magic = file
            .read_u32::<LittleEndian>()
            .context("file too short for a magic")?;

        match magic {
            MH_MAGIC_64 | MH_CIGAM_64 => {
                println!("match {} file", "64-bit Mach-O".red());
                Ok(vec![self.dump_slice(file, 0)?])
            }
            MH_MAGIC | MH_CIGAM => {
                println!("match {} file", "32-bit Mach-O".red());
                bail!("32-bit Mach-O is not supported yet")
            }
            FAT_CIGAM => {
                println!("match {} file", "fat_be".red());
                self.handle_fat(file, ByteOrder::Big)
            }
            FAT_MAGIC => {
                println!("match {} file", "fat_le".red());
                self.handle_fat(file, ByteOrder::Little)
            }
            magic => bail!("Unknown magic num: {}", format!("{:#x}", magic).red()),
        }
    }

    fn dump_slice<R: Read + Seek>(
        &self,
        file: &mut R,
        global_offset: u64,
    ) -> Result<(MachHeader64, ByteOrder)> {
        let raw = read_at(file, global_offset, MachHeader64::SIZE)?;
        let (header, order) = MachHeader64::parse(&raw)?;
        print_header(&header, order);
        Ok((header, order))
    }

    fn handle_fat<R: Read + Seek>(&self, file: &mut R, order: ByteOrder) -> Result<Dumped> {
        let fat_header = FatHeader::from_bytes(&read_at(file, 0, FatHeader::SIZE)?, order)?;
        let nfat_arch = fat_header.nfat_arch;

        println!("find {} archs", nfat_arch);

        let dump_all = match nfat_arch {
            0 => bail!("No arch found"),
            1 => true,
            _ => self.ask_for_confirmation("More than one arch found, dump all?")?,
        };

        let mut dumped = Vec::new();
        for i in 0..nfat_arch as u64 {
            let offset = FatHeader::SIZE as u64 + i * FatArch::SIZE as u64;
            let fat_arch = FatArch::from_bytes(&read_at(file, offset, FatArch::SIZE)?, order)?;

            let name = mach_header::consts::cpu_name(fat_arch.cputype).unwrap_or("unknown");
            println!("match {} arch at {:#x}", name.red(), fat_arch.offset);

            if !dump_all && !self.ask_for_confirmation("Dump this arch?")? {
                continue;
            }

            match self.dump_slice(file, fat_arch.offset as u64) {
                Ok(slice) => dumped.push(slice),
                Err(err) => eprintln!("skipping {} slice: {:#}", name, err),
            }
        }
        Ok(dumped)
    }
}
