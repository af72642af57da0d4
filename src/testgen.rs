//! Synthetic fixture project generation

use std::path::Path;

use anyhow::Context;

/// (path, content) pairs making up the fixture project. Covers the shapes
/// the analyzer cares about: plain usage edges, a protocol conformance, a
/// dependency cycle, an orphan, and a bridging header to Objective-C.
const FIXTURE_FILES: &[(&str, &str)] = &[
    (
        "Sources/AppDelegate.swift",
        r#"import UIKit

class AppDelegate {
    var window: UIWindow?
    var store: DataStore?

    func applicationDidFinishLaunching() {
        NetworkManager.shared.configureSession()
        let legacy: LegacyStore = LegacyStore()
        legacy.migrateIfNeeded()
        Logger.shared.record("launched")
    }
}
"#,
    ),
    (
        "Sources/NetworkManager.swift",
        r#"import Foundation

class NetworkManager {
    static let shared = NetworkManager()
    var lastSnapshot: DataStore?

    func configureSession() {
        Logger.shared.record("session configured")
    }
}
"#,
    ),
    (
        "Sources/DataStore.swift",
        r#"import Foundation

protocol DataStoreDelegate {
    func storeDidChange()
}

struct DataStore {
    var delegate: DataStoreDelegate?

    func persistSnapshot() {
        Logger.shared.record("persisted")
    }
}
"#,
    ),
    (
        "Sources/Logger.swift",
        r#"import Foundation

class Logger {
    static let shared = Logger()

    func record(_ message: String) {
        // Sink chosen at runtime.
    }
}
"#,
    ),
    (
        "Sources/SyncService.swift",
        r#"import Foundation

class SyncService {
    var scheduler: SyncScheduler?

    func beginSynchronization() {
        scheduler?.scheduleNextRun()
    }
}
"#,
    ),
    (
        "Sources/SyncScheduler.swift",
        r#"import Foundation

class SyncScheduler {
    var service: SyncService?

    func scheduleNextRun() {
        service?.beginSynchronization()
    }
}
"#,
    ),
    (
        "Sources/UnusedFormatter.swift",
        r#"import Foundation

class UnusedFormatter {
    func prettify(_ value: String) -> String {
        value
    }
}
"#,
    ),
    (
        "Legacy/LegacyStore.h",
        r#"#import <Foundation/Foundation.h>

@interface LegacyStore : NSObject
- (void)migrateIfNeeded;
@end
"#,
    ),
    (
        "Legacy/LegacyStore.m",
        r#"#import "LegacyStore.h"

@implementation LegacyStore
- (void)migrateIfNeeded {
    NSLog(@"migrating");
}
@end
"#,
    ),
    (
        "App-Bridging-Header.h",
        r#"#import "LegacyStore.h"
"#,
    ),
];

/// Write the fixture project under `dir`.
pub fn generate(dir: &Path) -> anyhow::Result<()> {
    for (rel_path, content) in FIXTURE_FILES {
        let path = dir.join(rel_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        std::fs::write(&path, content).with_context(|| format!("cannot write {}", path.display()))?;
    }
    println!("wrote {} fixture files under {}", FIXTURE_FILES.len(), dir.display());
    println!("try: grove --root {} analyze --dot", dir.display());
    Ok(())
}
