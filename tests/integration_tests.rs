use bmp_lsb::{
    cli::{BitsArg, ChannelArg, HideArgs, InspectArgs, ModeArgs, RecoverArgs},
    handler::{handle_hide, handle_inspect, handle_recover},
};
use image::{ImageBuffer, Rgb, RgbImage};
use rand::RngCore;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的 24 位 BMP 测试图像
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut img_buf: RgbImage = ImageBuffer::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 3) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(3))
        .for_each(|(pixel, chunk)| {
            *pixel = Rgb([chunk[0], chunk[1], chunk[2]]);
        });

    img_buf.save(path).expect("Failed to create test image.");
}

fn hide_args(image: PathBuf, text: PathBuf, dest: Option<PathBuf>, force: bool) -> HideArgs {
    HideArgs {
        image,
        text: Some(text),
        message: None,
        dest,
        force,
        mode: ModeArgs::default(),
    }
}

fn recover_args(image: PathBuf, text: Option<PathBuf>) -> RecoverArgs {
    RecoverArgs {
        image,
        text,
        stdout: false,
        force: false,
        mode: ModeArgs::default(),
    }
}

/// 验证从隐藏到恢复的完整流程
#[test]
fn test_handle_hide_and_recover_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.bmp");
    let hidden_image_path = dir.path().join("hidden.bmp");
    let source_text_path = dir.path().join("source.txt");
    let recovered_text_path = dir.path().join("recovered.txt");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "This is a test message for the handler! 这是一个给处理器的测试信息！";
    fs::write(&source_text_path, original_text)?;

    // 2. 测试 handle_hide
    handle_hide(hide_args(
        original_image_path.clone(),
        source_text_path.clone(),
        Some(hidden_image_path.clone()),
        false,
    ))?;
    assert!(
        hidden_image_path.exists(),
        "Hidden image should be created."
    );

    // 3. 测试 handle_recover
    handle_recover(recover_args(
        hidden_image_path.clone(),
        Some(recovered_text_path.clone()),
    ))?;
    assert!(
        recovered_text_path.exists(),
        "Recovered text file should be created."
    );

    // 4. 验证结果
    let recovered_text = fs::read_to_string(&recovered_text_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text must match the original."
    );

    Ok(())
}

/// 验证隐写后的图像仍能被正常解码，且每个通道最多只变化 1
#[test]
fn test_hidden_image_stays_a_valid_bitmap() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.bmp");
    let hidden_image_path = dir.path().join("hidden.bmp");
    let source_text_path = dir.path().join("source.bin");

    create_test_image(&original_image_path, 37, 21);
    let mut payload = vec![0u8; 200];
    rand::rng().fill_bytes(&mut payload);
    fs::write(&source_text_path, &payload)?;

    handle_hide(hide_args(
        original_image_path.clone(),
        source_text_path,
        Some(hidden_image_path.clone()),
        false,
    ))?;

    let original = image::open(&original_image_path)?.to_rgb8();
    let hidden = image::open(&hidden_image_path)?.to_rgb8();
    assert_eq!(original.dimensions(), hidden.dimensions());
    assert!(
        original
            .as_raw()
            .iter()
            .zip(hidden.as_raw())
            .all(|(a, b)| a.abs_diff(*b) <= 1)
    );
    assert_ne!(original.as_raw(), hidden.as_raw());

    Ok(())
}

/// 验证当用户不提供输出路径时，是否能正确生成默认路径并完成操作
#[test]
fn test_handle_hide_and_recover_with_defaults() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.bmp");
    let source_text_path = dir.path().join("source.txt");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "Testing default path generation. 测试默认路径生成。";
    fs::write(&source_text_path, original_text)?;

    // 2. 测试 handle_hide，不提供 dest 路径
    handle_hide(hide_args(
        original_image_path.clone(),
        source_text_path.clone(),
        None,
        false,
    ))?;

    // 验证默认的隐藏图像文件是否已创建
    let expected_hidden_path = dir.path().join("doctored_original.bmp");
    assert!(
        expected_hidden_path.exists(),
        "Default hidden image should be created at: {:?}",
        expected_hidden_path
    );

    // 3. 测试 handle_recover，不提供 text 输出路径
    handle_recover(recover_args(expected_hidden_path, None))?;

    // 验证默认的恢复文本文件是否已创建
    let expected_recovered_path = dir.path().join("recovered_doctored_original.txt");
    assert!(
        expected_recovered_path.exists(),
        "Default recovered text file should be created at: {:?}",
        expected_recovered_path
    );

    // 4. 验证结果
    let recovered_text = fs::read_to_string(&expected_recovered_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text from default file must match the original."
    );

    Ok(())
}

/// 验证 --message 与非默认模式的组合
#[test]
fn test_hide_message_with_two_bit_red_channel() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let lowercase_path = dir.path().join("cover.bmp");
    let image_path = dir.path().join("cover.BMP");
    let dest_path = dir.path().join("cover_hidden.bmp");
    let recovered_path = dir.path().join("message.txt");
    create_test_image(&lowercase_path, 40, 30);
    // 扩展名检查不区分大小写
    fs::rename(&lowercase_path, &image_path)?;

    let mode = ModeArgs {
        bits: BitsArg::Two,
        channel: ChannelArg::Red,
    };
    handle_hide(HideArgs {
        image: image_path,
        text: None,
        message: Some("What is your message? 秘密".to_string()),
        dest: Some(dest_path.clone()),
        force: false,
        mode,
    })?;

    handle_recover(RecoverArgs {
        image: dest_path.clone(),
        text: Some(recovered_path.clone()),
        stdout: false,
        force: false,
        mode,
    })?;
    assert_eq!(
        fs::read_to_string(&recovered_path)?,
        "What is your message? 秘密"
    );

    // 模式不一致时读出的长度前缀没有意义
    let mismatched = handle_recover(RecoverArgs {
        image: dest_path,
        text: Some(dir.path().join("garbage.txt")),
        stdout: false,
        force: false,
        mode: ModeArgs::default(),
    });
    if let Ok(()) = mismatched {
        let garbage = fs::read(dir.path().join("garbage.txt"))?;
        assert_ne!(garbage, "What is your message? 秘密".as_bytes());
    }

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("image.bmp");
    let text_path = dir.path().join("text.txt");
    let dest_path = dir.path().join("dest.bmp");

    create_test_image(&image_path, 50, 50);
    fs::write(&text_path, "some text")?;

    // 2. 场景一：测试覆盖保护
    // 先创建一个同名的目标文件，模拟“文件已存在”的场景
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;
    assert!(dest_path.exists());

    // 执行并断言操作会失败
    let result = handle_hide(hide_args(
        image_path.clone(),
        text_path.clone(),
        Some(dest_path.clone()),
        false,
    ));
    assert!(result.is_err(), "Execution should fail without --force when file exists.");
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 3. 场景二：测试强制覆盖
    let result = handle_hide(hide_args(
        image_path.clone(),
        text_path.clone(),
        Some(dest_path.clone()),
        true,
    ));
    assert!(result.is_ok(), "Execution should succeed with --force when file exists.");

    // 验证文件确实被覆盖（内容不再是 "this is a dummy file..."）
    let dummy_content = fs::read(&dest_path)?;
    assert_ne!(dummy_content, b"this is a dummy file to be overwritten");

    Ok(())
}

/// 验证空间不足时的错误处理
#[test]
fn test_handle_hide_not_enough_space() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("small.bmp");
    let text_path = dir.path().join("large.txt");
    let dest_path = dir.path().join("dest.bmp");

    // 创建一个非常小的图片
    create_test_image(&image_path, 10, 10);
    // 创建一个非常大的文本
    let large_text = "a".repeat(5000);
    fs::write(&text_path, large_text)?;

    // 2. 执行并断言错误
    let result = handle_hide(hide_args(image_path, text_path, Some(dest_path.clone()), false));

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(format!("{e:#}").contains("bits but the image can only hold"));
    }
    assert!(!dest_path.exists(), "No output may be written on failure.");

    Ok(())
}

/// 验证非 .bmp 扩展名的输入会被拒绝
#[test]
fn test_rejects_non_bmp_extension() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("picture.png");
    let text_path = dir.path().join("text.txt");
    fs::write(&text_path, "hello")?;

    let result = handle_hide(hide_args(image_path.clone(), text_path, None, false));
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains(".bmp extension"));
    }

    let result = handle_recover(recover_args(image_path, None));
    assert!(result.is_err());

    Ok(())
}

/// 验证读取不存在的图像时返回 I/O 错误
#[test]
fn test_missing_image_is_reported() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let result = handle_inspect(InspectArgs {
        image: dir.path().join("missing.bmp"),
    });

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Unable to read image file"));
        assert!(
            e.chain()
                .any(|cause| cause.to_string().to_lowercase().contains("no such file"))
        );
    }

    Ok(())
}

/// 验证 inspect 能解析由 image 库生成的位图
#[test]
fn test_handle_inspect() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("inspect.bmp");
    create_test_image(&image_path, 9, 4);

    handle_inspect(InspectArgs { image: image_path })?;

    let not_bitmap = dir.path().join("text.bmp");
    fs::write(&not_bitmap, "definitely not a bitmap, but long enough to pass the size check")?;
    let result = handle_inspect(InspectArgs { image: not_bitmap });
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(format!("{e:#}").contains("missing 'BM' signature"));
    }

    Ok(())
}

/// 验证 --stdout 以有损文本形式输出，且不会写出默认的恢复文件
#[test]
fn test_recover_to_stdout_with_invalid_utf8() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("cover.bmp");
    let hidden_path = dir.path().join("hidden.bmp");
    let payload_path = dir.path().join("payload.bin");

    create_test_image(&image_path, 30, 30);
    fs::write(&payload_path, [b'o', b'k', 0xFF, 0xFE, b'!'])?;

    handle_hide(hide_args(
        image_path,
        payload_path,
        Some(hidden_path.clone()),
        false,
    ))?;

    handle_recover(RecoverArgs {
        image: hidden_path,
        text: None,
        stdout: true,
        force: false,
        mode: ModeArgs::default(),
    })?;

    assert!(
        !dir.path().join("recovered_hidden.txt").exists(),
        "--stdout must not write a recovered file."
    );
    let written: Vec<_> = fs::read_dir(dir.path())?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("recovered_"))
        .collect();
    assert!(written.is_empty());

    Ok(())
}

/// 验证无效的封面图像在嵌入之前就被拒绝，且不会写出任何文件
#[test]
fn test_hide_rejects_unsupported_cover_before_writing() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("fake.bmp");
    let dest_path = dir.path().join("dest.bmp");
    fs::write(&image_path, "definitely not a bitmap, but long enough to pass the size check")?;

    let result = handle_hide(HideArgs {
        image: image_path,
        text: None,
        message: Some("hello".to_string()),
        dest: Some(dest_path.clone()),
        force: false,
        mode: ModeArgs::default(),
    });

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("is not a supported bitmap"));
        assert!(format!("{e:#}").contains("missing 'BM' signature"));
    }
    assert!(!dest_path.exists());

    Ok(())
}
