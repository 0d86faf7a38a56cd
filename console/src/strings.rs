macro_rules! define_strings {
    (
        $($name:ident = $value:literal);*$(;)?
    ) => {
        $(
            pub const $name: &str = $value;
        )*
    };
}

pub mod utils {
    define_strings! {
        THREADS =
            "Number of threads to use. 0 lets the thread pool pick the number \
            of available cores.";
        VERBOSE =
            "Print debug messages.";
    }
}

pub mod prepare {
    define_strings! {
        OBS =
            "Path to the observed Juicer dump (`dump observed NONE ... BP <res>`).";
        OE =
            "Path to the observed/expected Juicer dump of the same chromosome \
            and resolution.";
        CHROM =
            "Chromosome name written to the anchor reference BED.";
        RES =
            "Resolution (bin width in bp) of both dumps.";
        OUT =
            "Path of the prepared interaction table.";
        ANCHOR_DIR =
            "Directory for the anchor reference BED. The file is named \
            `<chrom>.bed`.";
    }
}

pub mod call {
    define_strings! {
        INPUT =
            "Path to scored bin pairs, one `bin1 bin2 score` record per line.";
        OUT =
            "Path of the generated BEDPE file.";
        CHROM =
            "Chromosome name of the input records.";
        RES =
            "Resolution (bin width in bp) of the input records.";
        MIN_DIST =
            "Minimum distance from the diagonal, in bins. Bin pairs closer \
            than this are discarded before any thresholding.";
        PERCENTILE =
            "Score percentile (0-100) of the distance-filtered records used as \
            the significance threshold. Every record at or above it is \
            reported as a loop.";
        CLUSTER_THRESHOLD =
            "Absolute score threshold. If set, records at or above it are \
            clustered with DBSCAN and one loop per cluster is reported \
            instead of percentile filtering.";
        EPS =
            "DBSCAN neighbourhood radius in bins.";
        MIN_SAMPLES =
            "Minimum number of records (including itself) within the \
            neighbourhood radius for a record to be a core point.";
    }
}

pub mod merge {
    define_strings! {
        FILES =
            "Per-resolution BEDPE files of one chromosome.";
        RESOLUTIONS =
            "Resolutions of the BEDPE files, in the same order.";
        OUT =
            "Path of the merged BEDPE file.";
        TOLERANCE =
            "Maximum distance (bp) between loop centroids for a coarser loop \
            to be considered a duplicate of a finer one.";
    }
}
